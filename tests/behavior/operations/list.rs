use crate::*;
use objtree::error::Result;
use objtree::storage::constants::SIZE_FETCH_CONCURRENCY;
use objtree::storage::{Entry, Folder, Listing, Partition, StorageService};

pub fn tests(service: &Service, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        service,
        test_list_reconstructs_hierarchy,
        test_list_parent_paths,
        test_list_merges_partitions,
        test_list_reports_sizes,
        test_list_without_sizes,
        test_list_deduplicates_deep_folders,
        test_list_drops_folder_after_last_delete,
        test_list_unknown_directory_is_empty,
        test_list_normalizes_requested_path,
        test_list_exposes_file_and_folder_with_same_name,
        test_list_survives_failing_backend,
        test_list_reports_zero_for_vanished_files,
        test_list_bounds_concurrent_size_reads
    ));
}

fn file_names(listing: &Listing) -> Vec<&str> {
    listing.files.iter().map(|f| f.name.as_str()).collect()
}

fn folder(name: &str, path: &str) -> Folder {
    Folder {
        name: name.to_string(),
        path: path.to_string(),
    }
}

async fn test_list_reconstructs_hierarchy(_service: Service) -> Result<()> {
    let service = new_memory_service().await?;
    let text = service.partition(Partition::Text);
    for path in ["data/config/settings.json", "data/readme.md", "top.txt"] {
        assert!(text.create(path, "{}").await);
    }

    let root = service.list("", true).await?;
    assert_eq!(file_names(&root), vec!["top.txt"]);
    assert_eq!(root.folders, vec![folder("data", "data")]);

    let data = service.list("data", true).await?;
    assert_eq!(file_names(&data), vec!["readme.md"]);
    assert_eq!(data.folders, vec![folder("config", "data/config")]);

    let config = service.list("data/config", true).await?;
    assert_eq!(file_names(&config), vec!["settings.json"]);
    assert!(config.folders.is_empty());
    assert_eq!(config.files[0].full_path, "data/config/settings.json");
    assert_eq!(config.files[0].mime_type, "application/json");
    Ok(())
}

async fn test_list_parent_paths(service: Service) -> Result<()> {
    let base = TEST_FIXTURE.new_dir_path();
    let text = service.partition(Partition::Text);
    assert!(text.create(&format!("{base}/b/c/file.txt"), "x").await);

    let root = service.list("", false).await?;
    assert_eq!(root.current_path, "");
    assert_eq!(root.parent_path, None);

    let top = service.list(&base, false).await?;
    assert_eq!(top.current_path, base);
    assert_eq!(top.parent_path.as_deref(), Some(""));

    let deep = service.list(&format!("{base}/b/c"), false).await?;
    assert_eq!(deep.parent_path, Some(format!("{base}/b")));
    Ok(())
}

async fn test_list_merges_partitions(service: Service) -> Result<()> {
    let base = TEST_FIXTURE.new_dir_path();
    let text = service.partition(Partition::Text);
    let binary = service.partition(Partition::Binary);

    assert!(text.create(&format!("{base}/notes.txt"), "hello").await);
    assert!(text.create(&format!("{base}/docs/a.md"), "# a").await);
    assert!(binary.create(&format!("{base}/logo.png"), vec![0x89, 0x50]).await);
    assert!(binary.create(&format!("{base}/notes.txt"), vec![1, 2, 3]).await);
    assert!(binary.create(&format!("{base}/docs/b.pdf"), vec![0]).await);
    assert!(binary.create(&format!("{base}/images/c.png"), vec![0]).await);

    let listing = service.list(&base, true).await?;

    let files: Vec<_> = listing
        .files
        .iter()
        .map(|f| (f.name.as_str(), f.partition))
        .collect();
    assert_eq!(
        files,
        vec![
            ("logo.png", Partition::Binary),
            ("notes.txt", Partition::Text),
            ("notes.txt", Partition::Binary),
        ]
    );
    assert_eq!(
        listing.folders,
        vec![
            folder("docs", &format!("{base}/docs")),
            folder("images", &format!("{base}/images")),
        ]
    );
    Ok(())
}

async fn test_list_reports_sizes(service: Service) -> Result<()> {
    let base = TEST_FIXTURE.new_dir_path();
    let text = service.partition(Partition::Text);
    let binary = service.partition(Partition::Binary);
    let content = TEST_FIXTURE.new_bytes(1..1024);

    assert!(text.create(&format!("{base}/unicode.txt"), "héllo").await);
    assert!(binary.create(&format!("{base}/data.bin"), content.clone()).await);

    let listing = service.list(&base, true).await?;
    let size_of = |name: &str| -> u64 {
        listing
            .files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.size_bytes)
            .unwrap_or(u64::MAX)
    };

    // UTF-8 encoded length, not character count
    assert_eq!(size_of("unicode.txt"), 6);
    assert_eq!(size_of("data.bin"), content.len() as u64);
    Ok(())
}

async fn test_list_without_sizes(service: Service) -> Result<()> {
    let base = TEST_FIXTURE.new_dir_path();
    let text = service.partition(Partition::Text);
    assert!(text.create(&format!("{base}/a.txt"), "some content").await);

    let listing = service.list(&base, false).await?;
    assert_eq!(
        listing.files,
        vec![Entry {
            name: "a.txt".to_string(),
            full_path: format!("{base}/a.txt"),
            size_bytes: 0,
            mime_type: "text/plain".to_string(),
            partition: Partition::Text,
        }]
    );
    Ok(())
}

async fn test_list_deduplicates_deep_folders(service: Service) -> Result<()> {
    let base = TEST_FIXTURE.new_dir_path();
    let text = service.partition(Partition::Text);
    let binary = service.partition(Partition::Binary);
    for name in ["x/1.txt", "x/2.txt", "x/y/3.txt", "x/y/z/4.txt"] {
        assert!(text.create(&format!("{base}/{name}"), "x").await);
    }
    assert!(binary.create(&format!("{base}/x/5.bin"), vec![5]).await);

    let listing = service.list(&base, false).await?;
    assert_eq!(listing.folders, vec![folder("x", &format!("{base}/x"))]);
    assert!(listing.files.is_empty());

    let nested = service.list(&format!("{base}/x"), false).await?;
    assert_eq!(file_names(&nested), vec!["1.txt", "2.txt", "5.bin"]);
    assert_eq!(nested.folders, vec![folder("y", &format!("{base}/x/y"))]);
    Ok(())
}

async fn test_list_drops_folder_after_last_delete(service: Service) -> Result<()> {
    let base = TEST_FIXTURE.new_dir_path();
    let data = format!("{base}/data");
    let settings = format!("{data}/config/settings.json");
    let text = service.partition(Partition::Text);

    assert!(text.create(&settings, "{}").await);
    assert!(text.create(&format!("{data}/readme.md"), "# readme").await);

    let before = service.list(&data, false).await?;
    assert_eq!(before.folders.len(), 1);

    service.delete_file(&settings, false).await?;

    let after = service.list(&data, false).await?;
    assert!(after.folders.is_empty());
    assert_eq!(file_names(&after), vec!["readme.md"]);
    Ok(())
}

async fn test_list_unknown_directory_is_empty(service: Service) -> Result<()> {
    let missing = TEST_FIXTURE.new_dir_path();

    let listing = service.list(&missing, true).await?;
    assert!(listing.files.is_empty());
    assert!(listing.folders.is_empty());
    assert_eq!(listing.current_path, missing);
    Ok(())
}

async fn test_list_normalizes_requested_path(service: Service) -> Result<()> {
    let base = TEST_FIXTURE.new_dir_path();
    let text = service.partition(Partition::Text);
    assert!(text.create(&format!("{base}/sub/a.txt"), "a").await);

    let listing = service.list(&format!("/{base}//sub/"), false).await?;
    assert_eq!(listing.current_path, format!("{base}/sub"));
    assert_eq!(file_names(&listing), vec!["a.txt"]);
    Ok(())
}

async fn test_list_exposes_file_and_folder_with_same_name(service: Service) -> Result<()> {
    let base = TEST_FIXTURE.new_dir_path();
    let text = service.partition(Partition::Text);
    assert!(text.create(&format!("{base}/report"), "summary").await);
    assert!(text.create(&format!("{base}/report/2024.csv"), "a,b").await);

    let listing = service.list(&base, false).await?;
    assert_eq!(file_names(&listing), vec!["report"]);
    assert_eq!(
        listing.folders,
        vec![folder("report", &format!("{base}/report"))]
    );
    Ok(())
}

async fn test_list_survives_failing_backend(_service: Service) -> Result<()> {
    let service = StorageService::new(FailingStore);

    let listing = service.list("anything", true).await?;
    assert!(listing.files.is_empty());
    assert!(listing.folders.is_empty());
    assert_eq!(listing.parent_path.as_deref(), Some(""));
    Ok(())
}

async fn test_list_reports_zero_for_vanished_files(_service: Service) -> Result<()> {
    let service = StorageService::new(VanishingStore {
        keys: vec![
            "text/gone.txt".to_string(),
            "binary/gone.png".to_string(),
            "unrelated/key".to_string(),
        ],
    });

    let listing = service.list("", true).await?;
    let sizes: Vec<_> = listing
        .files
        .iter()
        .map(|f| (f.name.as_str(), f.size_bytes))
        .collect();
    assert_eq!(sizes, vec![("gone.png", 0), ("gone.txt", 0)]);
    Ok(())
}

async fn test_list_bounds_concurrent_size_reads(_service: Service) -> Result<()> {
    let keys: Vec<String> = (0..40).map(|i| format!("text/wide/f{i:02}.txt")).collect();
    let store = CountingStore::new(keys);
    let service = StorageService::new(store.clone());

    let listing = service.list("wide", true).await?;
    assert_eq!(listing.files.len(), 40);
    assert_eq!(listing.files[0].name, "f00.txt");
    assert!(listing.files.iter().all(|f| f.size_bytes == 17));
    assert!(store.peak() >= 1);
    assert!(store.peak() <= SIZE_FETCH_CONCURRENCY);
    Ok(())
}
