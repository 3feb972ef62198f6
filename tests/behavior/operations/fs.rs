use crate::*;
use objtree::error::{ErrorKind, Result};
use objtree::storage::Partition;

pub fn tests(service: &Service, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        service,
        test_fs_folder_path_is_not_found,
        test_fs_file_blocks_folder_of_same_name
    ));
}

async fn test_fs_folder_path_is_not_found(_service: Service) -> Result<()> {
    let root = TEST_FIXTURE.new_local_dir();
    let service = new_fs_service(&root).await?;
    service
        .create_or_update("data/readme.md", "# readme", false)
        .await?;
    assert!(root.join("text/data").is_dir());

    let err = service.get_file("data", false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = service.stat("data", false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = service.delete_file("data", false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let listing = service.list("data", true).await?;
    assert_eq!(listing.files.len(), 1);
    assert_eq!(listing.files[0].name, "readme.md");
    Ok(())
}

async fn test_fs_file_blocks_folder_of_same_name(_service: Service) -> Result<()> {
    let root = TEST_FIXTURE.new_local_dir();
    let service = new_fs_service(&root).await?;
    service.create_or_update("report", "summary", false).await?;

    let err = service
        .create_or_update("report/2024.csv", "a,b", false)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("'report' is already a file"));

    let content = service.partition(Partition::Text).get_text("report").await;
    assert_eq!(content.as_deref(), Some("summary"));
    Ok(())
}
