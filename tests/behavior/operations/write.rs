use crate::*;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use objtree::error::{ErrorKind, Result};
use objtree::storage::{Partition, StorageService};

pub fn tests(service: &Service, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        service,
        test_create_text_file,
        test_create_binary_file_decodes_base64,
        test_create_overwrites_existing_file,
        test_malformed_base64_is_rejected,
        test_line_wrapped_base64_is_accepted,
        test_create_requires_path,
        test_create_failing_backend_is_backend_error,
        test_put_local_binary_file_verbatim,
        test_put_local_text_requires_utf8,
        test_put_local_missing_source
    ));
}

async fn test_create_text_file(service: Service) -> Result<()> {
    let path = TEST_FIXTURE.new_file_path("notes.txt");
    service.create_or_update(&path, "hello", false).await?;

    let stored = service.partition(Partition::Text).get_text(&path).await;
    assert_eq!(stored.as_deref(), Some("hello"));
    Ok(())
}

async fn test_create_binary_file_decodes_base64(service: Service) -> Result<()> {
    let path = TEST_FIXTURE.new_file_path("blob.bin");
    let bytes = TEST_FIXTURE.new_bytes(1..2048);

    service
        .create_or_update(&path, &STANDARD.encode(&bytes), true)
        .await?;

    assert_eq!(service.partition(Partition::Binary).get(&path).await, Some(bytes));
    assert_eq!(service.partition(Partition::Text).get(&path).await, None);
    Ok(())
}

async fn test_create_overwrites_existing_file(service: Service) -> Result<()> {
    let path = TEST_FIXTURE.new_file_path("notes.txt");
    service.create_or_update(&path, "one", false).await?;
    service.create_or_update(&path, "two", false).await?;

    let stored = service.partition(Partition::Text).get_text(&path).await;
    assert_eq!(stored.as_deref(), Some("two"));
    Ok(())
}

async fn test_malformed_base64_is_rejected(service: Service) -> Result<()> {
    let path = TEST_FIXTURE.new_file_path("bad.bin");

    let err = service
        .create_or_update(&path, "not-base64!!", true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let missing = service.get_file(&path, true).await.unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);
    Ok(())
}

async fn test_line_wrapped_base64_is_accepted(service: Service) -> Result<()> {
    let path = TEST_FIXTURE.new_file_path("wrapped.bin");

    service
        .create_or_update(&path, "AAEC\nAwQF\r\n", true)
        .await?;

    let stored = service.partition(Partition::Binary).get(&path).await;
    assert_eq!(stored, Some(vec![0, 1, 2, 3, 4, 5]));
    Ok(())
}

async fn test_create_requires_path(service: Service) -> Result<()> {
    for path in ["", "/", "//"] {
        let err = service
            .create_or_update(path, "content", false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    Ok(())
}

async fn test_create_failing_backend_is_backend_error(_service: Service) -> Result<()> {
    let service = StorageService::new(FailingStore);

    let err = service
        .create_or_update("a.txt", "content", false)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Backend);

    // Validation happens before the backend is touched
    let err = service
        .create_or_update("a.bin", "%%%", true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    Ok(())
}

async fn test_put_local_binary_file_verbatim(service: Service) -> Result<()> {
    let dir = TEST_FIXTURE.new_local_dir();
    let source = dir.join("payload.bin");
    let bytes = TEST_FIXTURE.new_bytes(1..4096);
    std::fs::write(&source, &bytes)?;

    let path = TEST_FIXTURE.new_file_path("payload.bin");
    service.put_local(&path, &source, true).await?;

    assert_eq!(service.partition(Partition::Binary).get(&path).await, Some(bytes));
    Ok(())
}

async fn test_put_local_text_requires_utf8(service: Service) -> Result<()> {
    let dir = TEST_FIXTURE.new_local_dir();
    let good = dir.join("good.txt");
    let bad = dir.join("bad.txt");
    std::fs::write(&good, "plain text")?;
    std::fs::write(&bad, [0xff, 0xfe, 0x00])?;

    let path = TEST_FIXTURE.new_file_path("good.txt");
    service.put_local(&path, &good, false).await?;
    let stored = service.partition(Partition::Text).get_text(&path).await;
    assert_eq!(stored.as_deref(), Some("plain text"));

    let rejected = TEST_FIXTURE.new_file_path("bad.txt");
    let err = service.put_local(&rejected, &bad, false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(service.partition(Partition::Text).get(&rejected).await, None);
    Ok(())
}

async fn test_put_local_missing_source(service: Service) -> Result<()> {
    let dir = TEST_FIXTURE.new_local_dir();
    let path = TEST_FIXTURE.new_file_path("never.bin");

    let err = service
        .put_local(&path, &dir.join("absent.bin"), true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}
