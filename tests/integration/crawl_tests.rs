//! Integration tests for the crawler
//!
//! These tests run the full scheduler against an in-memory encyclopedia and
//! check the crawl cycle end-to-end: admission, depth, scoring, failures,
//! checkpoints and resume.

mod support;

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use support::{create_test_config, entry_points, title, Article, MemoryWiki};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wikifrontier::crawler::{run_crawl_with, CrawlOptions, CrawlScheduler};
use wikifrontier::crawler::ScrapedPage;
use wikifrontier::output::{
    Checkpointer, FileCheckpointer, OutputError, OutputResult, SqliteCheckpointer,
};
use wikifrontier::state::{NodeState, RunStatistics, RunStatus};

fn tractor() -> Article {
    Article {
        text: "A machine with wheels and an engine.".to_string(),
        categories: vec!["Category:Machines".to_string()],
        links: vec!["Farm C".to_string()],
    }
}

fn stored_titles(checkpointer: &FileCheckpointer) -> Vec<String> {
    let mut titles: Vec<String> = checkpointer
        .load_pages()
        .unwrap()
        .unwrap()
        .iter()
        .map(|p| p.title().to_string())
        .collect();
    titles.sort();
    titles
}

#[tokio::test]
async fn test_empty_frontier_is_successful_empty_run() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let wiki = Arc::new(MemoryWiki::new());

    let report = run_crawl_with(
        &config,
        "hash",
        &entry_points(&[], &[]),
        wiki.clone(),
        CrawlOptions::default(),
    )
    .await
    .unwrap();

    assert!(report.is_success());
    assert_eq!(report.status(), RunStatus::Completed);
    assert_eq!(report.stats.pages_attempted(), 0);
    assert_eq!(wiki.total_fetches(), 0);

    // The final checkpoint is written even for an empty run
    let checkpointer = FileCheckpointer::new(&config.output).unwrap();
    assert!(checkpointer.csv_path().exists());
    assert_eq!(checkpointer.load_pages().unwrap(), Some(vec![]));
    let stats = checkpointer.load_stats().unwrap().unwrap();
    assert_eq!(stats.status, RunStatus::Completed);
    assert_eq!(stats.config_hash, "hash");
}

#[tokio::test]
async fn test_entry_point_pages_are_never_claimed() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let wiki = Arc::new(
        MemoryWiki::new()
            .portal("Portal:Farming", &["Farm A", "Weather"])
            .category("Category:Farming", &["Farm B"])
            .farm_article("Farm A", &[])
            .farm_article("Farm B", &[]),
    );

    let mut scheduler = CrawlScheduler::new(&config, wiki.clone(), "hash");
    let report = scheduler
        .run(&entry_points(&["Portal:Farming"], &["Category:Farming"]))
        .await
        .unwrap();

    let registry = scheduler.registry();
    assert_eq!(registry.state_of(&title("Portal:Farming")), None);
    assert_eq!(registry.state_of(&title("Category:Farming")), None);
    // Off-topic portal links are filtered before admission
    assert_eq!(registry.state_of(&title("Weather")), None);
    assert_eq!(
        registry.state_of(&title("Farm A")),
        Some(NodeState::Scraped)
    );
    assert_eq!(
        registry.state_of(&title("Farm B")),
        Some(NodeState::Scraped)
    );

    assert_eq!(wiki.fetch_count("Portal:Farming"), 0);
    assert_eq!(report.stats.pages_accepted, 2);
}

#[tokio::test]
async fn test_duplicate_links_collapse_to_one_fetch() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let wiki = Arc::new(
        MemoryWiki::new()
            .portal("Portal:Farming", &["Farm A", "Farm_A", "farm A"])
            .category("Category:Farming", &["Farm B", "Farm A"])
            .farm_article("Farm A", &["Farm B", "Farm_B", "Farm A"])
            .farm_article("Farm B", &["Farm A", "farm_A"]),
    );

    let mut scheduler = CrawlScheduler::new(&config, wiki.clone(), "hash");
    let report = scheduler
        .run(&entry_points(&["Portal:Farming"], &["Category:Farming"]))
        .await
        .unwrap();

    assert_eq!(wiki.fetch_count("Farm A"), 1);
    assert_eq!(wiki.fetch_count("Farm B"), 1);
    assert_eq!(wiki.total_fetches(), 2);
    assert_eq!(scheduler.registry().total_seen(), 2);
    assert_eq!(report.stats.pages_accepted, 2);
    assert_eq!(scheduler.results().len(), 2);
}

#[tokio::test]
async fn test_depth_limit_stops_expansion() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawler.max_depth = 1;

    let wiki = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm seed"])
            .farm_article("Farm seed", &["Farm A"])
            .farm_article("Farm A", &["Farm B"])
            .farm_article("Farm B", &["Farm C"])
            .farm_article("Farm C", &[]),
    );

    let mut scheduler = CrawlScheduler::new(&config, wiki.clone(), "hash");
    let report = scheduler
        .run(&entry_points(&[], &["Category:Farming"]))
        .await
        .unwrap();

    assert_eq!(wiki.fetch_count("Farm seed"), 1);
    assert_eq!(wiki.fetch_count("Farm A"), 1);
    assert_eq!(wiki.fetch_count("Farm B"), 0);

    let registry = scheduler.registry();
    assert_eq!(registry.state_of(&title("Farm B")), None);
    assert_eq!(registry.state_of(&title("Farm C")), None);
    assert_eq!(registry.total_seen(), 2);
    assert_eq!(report.stats.pages_accepted, 2);
}

#[tokio::test]
async fn test_depth_zero_fetches_entry_members_only() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawler.max_depth = 0;

    let wiki = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm seed"])
            .farm_article("Farm seed", &["Farm A"])
            .farm_article("Farm A", &[]),
    );

    let report = run_crawl_with(
        &config,
        "hash",
        &entry_points(&[], &["Category:Farming"]),
        wiki.clone(),
        CrawlOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(wiki.total_fetches(), 1);
    assert_eq!(report.stats.pages_accepted, 1);
}

#[tokio::test]
async fn test_below_threshold_pages_are_rejected() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let wiki = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A", "Tractor"])
            .farm_article("Farm A", &[])
            .article("Tractor", tractor())
            .farm_article("Farm C", &[]),
    );

    let mut scheduler = CrawlScheduler::new(&config, wiki.clone(), "hash");
    let report = scheduler
        .run(&entry_points(&[], &["Category:Farming"]))
        .await
        .unwrap();

    assert_eq!(report.stats.pages_accepted, 1);
    assert_eq!(report.stats.pages_rejected, 1);
    assert!(report.is_success());

    // A rejected page is resolved but never expanded
    assert_eq!(
        scheduler.registry().state_of(&title("Tractor")),
        Some(NodeState::Scraped)
    );
    assert_eq!(wiki.fetch_count("Farm C"), 0);

    let (pages, _) = scheduler.results().snapshot();
    let titles: Vec<String> = pages.iter().map(|p| p.title().to_string()).collect();
    assert_eq!(titles, vec!["Farm A"]);
}

#[tokio::test]
async fn test_run_with_only_rejections_is_not_success() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let wiki = Arc::new(
        MemoryWiki::new()
            .category("Category:Machines", &["Tractor"])
            .article("Tractor", tractor()),
    );

    let report = run_crawl_with(
        &config,
        "hash",
        &entry_points(&[], &["Category:Machines"]),
        wiki,
        CrawlOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.stats.pages_attempted(), 1);
    assert_eq!(report.stats.pages_accepted, 0);
    assert!(!report.is_success());
}

#[tokio::test]
async fn test_page_cap_is_respected() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawler.max_total_pages = 3;

    let members: Vec<String> = (1..=10).map(|i| format!("Farm {}", i)).collect();
    let member_refs: Vec<&str> = members.iter().map(String::as_str).collect();

    let mut wiki = MemoryWiki::new().category("Category:Farming", &member_refs);
    for member in &members {
        wiki = wiki.farm_article(member, &["Farm extra", "Farm more"]);
    }
    let wiki = Arc::new(wiki);

    let mut scheduler = CrawlScheduler::new(&config, wiki.clone(), "hash");
    let report = scheduler
        .run(&entry_points(&[], &["Category:Farming"]))
        .await
        .unwrap();

    assert_eq!(scheduler.registry().total_seen(), 3);
    assert!(scheduler.registry().is_at_capacity());
    assert_eq!(wiki.total_fetches(), 3);
    assert_eq!(report.stats.pages_accepted, 3);
    assert_eq!(report.status(), RunStatus::Completed);
    assert_eq!(report.pending, 0);
}

#[tokio::test]
async fn test_fetch_failures_are_recorded_as_failed() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let wiki = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A", "Farm gone", "Farm flaky"])
            .farm_article("Farm A", &["Farm gone", "Farm flaky"])
            .farm_article("Farm flaky", &[])
            .broken("Farm flaky"),
    );

    let mut scheduler = CrawlScheduler::new(&config, wiki.clone(), "hash");
    let report = scheduler
        .run(&entry_points(&[], &["Category:Farming"]))
        .await
        .unwrap();

    let registry = scheduler.registry();
    assert_eq!(
        registry.state_of(&title("Farm gone")),
        Some(NodeState::Failed)
    );
    assert_eq!(
        registry.state_of(&title("Farm flaky")),
        Some(NodeState::Failed)
    );

    // Failed nodes are never fetched again, even when linked later
    assert_eq!(wiki.fetch_count("Farm gone"), 1);
    assert_eq!(wiki.fetch_count("Farm flaky"), 1);

    assert_eq!(report.stats.pages_failed, 2);
    assert_eq!(report.stats.pages_not_found, 1);
    assert_eq!(report.stats.pages_accepted, 1);
    assert_eq!(report.registry.failed, 2);
    assert!(report.is_success());
}

#[tokio::test]
async fn test_every_batch_is_counted() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawler.batch_size = 1;

    let wiki = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A", "Farm B", "Farm C"])
            .farm_article("Farm A", &[])
            .farm_article("Farm B", &[])
            .farm_article("Farm C", &[]),
    );

    let report = run_crawl_with(
        &config,
        "hash",
        &entry_points(&[], &["Category:Farming"]),
        wiki,
        CrawlOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.stats.batches, 3);
    assert_eq!(report.stats.pages_accepted, 3);
}

#[tokio::test]
async fn test_checkpoint_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.output.compress = true;
    config.output.database_path = Some(dir.path().join("out").join("pages.db"));

    let wiki = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A", "Farm B"])
            .farm_article("Farm A", &["Farm B"])
            .farm_article("Farm B", &[]),
    );

    let mut scheduler = CrawlScheduler::new(&config, wiki, "hash").with_checkpointers(
        wikifrontier::output::build_checkpointers(&config.output).unwrap(),
    );
    scheduler
        .run(&entry_points(&[], &["Category:Farming"]))
        .await
        .unwrap();

    let checkpointer = FileCheckpointer::new(&config.output).unwrap();
    let paths = [
        checkpointer.csv_path(),
        checkpointer.json_path(),
        checkpointer.stats_path(),
    ];
    let before: Vec<Vec<u8>> = paths.iter().map(|p| fs::read(p).unwrap()).collect();

    // Writing the same result set again produces the same bytes
    let (pages, stats) = scheduler.results().snapshot();
    checkpointer.checkpoint(&pages, &stats).unwrap();
    checkpointer.checkpoint(&pages, &stats).unwrap();

    let after: Vec<Vec<u8>> = paths.iter().map(|p| fs::read(p).unwrap()).collect();
    assert_eq!(before, after);

    let database = SqliteCheckpointer::open(config.output.database_path.as_ref().unwrap()).unwrap();
    assert_eq!(database.count_pages().unwrap(), 2);
    assert_eq!(database.load_stats().unwrap(), Some(stats));
}

#[tokio::test]
async fn test_resume_skips_restored_pages() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());

    let first = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A", "Farm B"])
            .farm_article("Farm A", &["Farm D"])
            .farm_article("Farm B", &[])
            .farm_article("Farm D", &[]),
    );
    run_crawl_with(
        &config,
        "hash",
        &entry_points(&[], &["Category:Farming"]),
        first,
        CrawlOptions::default(),
    )
    .await
    .unwrap();

    let second = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A", "Farm B", "Farm C"])
            .farm_article("Farm A", &["Farm D"])
            .farm_article("Farm B", &[])
            .farm_article("Farm C", &[])
            .farm_article("Farm D", &[]),
    );
    let report = run_crawl_with(
        &config,
        "hash",
        &entry_points(&[], &["Category:Farming"]),
        second.clone(),
        CrawlOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(second.fetch_count("Farm A"), 0);
    assert_eq!(second.fetch_count("Farm B"), 0);
    assert_eq!(second.fetch_count("Farm C"), 1);
    // Reached again through Farm A's links, but already scraped
    assert_eq!(second.fetch_count("Farm D"), 0);

    assert_eq!(report.stats.pages_restored, 3);
    assert_eq!(report.stats.pages_accepted, 4);
    assert_eq!(report.stats.pages_attempted(), 1);

    let checkpointer = FileCheckpointer::new(&config.output).unwrap();
    assert_eq!(
        stored_titles(&checkpointer),
        vec!["Farm A", "Farm B", "Farm C", "Farm D"]
    );
}

#[tokio::test]
async fn test_resume_rediscovers_links_of_restored_pages() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawler.batch_size = 1;
    config.crawler.concurrency = 1;
    config.crawler.max_depth = 2;
    let eps = entry_points(&[], &["Category:Farming"]);

    let cancel = CancellationToken::new();
    let first = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A"])
            .farm_article("Farm A", &["Farm D"])
            .farm_article("Farm D", &["Farm E"])
            .cancel_on("Farm A", cancel.clone()),
    );
    let options = CrawlOptions {
        fresh: false,
        cancel,
    };
    let report = run_crawl_with(&config, "hash", &eps, first.clone(), options)
        .await
        .unwrap();

    // Farm D was claimed at depth 1 but never dispatched
    assert_eq!(report.status(), RunStatus::Interrupted);
    assert_eq!(report.pending, 1);
    assert_eq!(first.fetch_count("Farm D"), 0);

    let second = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A"])
            .farm_article("Farm A", &["Farm D"])
            .farm_article("Farm D", &["Farm E"])
            .farm_article("Farm E", &["Farm F"])
            .farm_article("Farm F", &[]),
    );
    let report = run_crawl_with(&config, "hash", &eps, second.clone(), CrawlOptions::default())
        .await
        .unwrap();

    assert_eq!(report.status(), RunStatus::Completed);
    assert_eq!(second.fetch_count("Farm A"), 0);
    assert_eq!(second.fetch_count("Farm D"), 1);
    // Depth is carried across the restart: Farm E sits at the limit
    assert_eq!(second.fetch_count("Farm E"), 1);
    assert_eq!(second.fetch_count("Farm F"), 0);

    let checkpointer = FileCheckpointer::new(&config.output).unwrap();
    let pages = checkpointer.load_pages().unwrap().unwrap();
    let depth_of = |name: &str| {
        pages
            .iter()
            .find(|p| p.title().as_str() == name)
            .map(|p| p.depth())
    };
    assert_eq!(depth_of("Farm A"), Some(0));
    assert_eq!(depth_of("Farm D"), Some(1));
    assert_eq!(depth_of("Farm E"), Some(2));
}

#[tokio::test]
async fn test_fresh_run_ignores_checkpoint() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let eps = entry_points(&[], &["Category:Farming"]);

    let first = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A"])
            .farm_article("Farm A", &[]),
    );
    run_crawl_with(&config, "hash", &eps, first, CrawlOptions::default())
        .await
        .unwrap();

    let second = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A"])
            .farm_article("Farm A", &[]),
    );
    let options = CrawlOptions {
        fresh: true,
        ..CrawlOptions::default()
    };
    let report = run_crawl_with(&config, "hash", &eps, second.clone(), options)
        .await
        .unwrap();

    assert_eq!(second.fetch_count("Farm A"), 1);
    assert_eq!(report.stats.pages_restored, 0);
    assert_eq!(report.stats.pages_accepted, 1);
}

#[tokio::test]
async fn test_unreadable_checkpoint_stops_resume() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    fs::create_dir_all(&config.output.directory).unwrap();
    fs::write(config.output.directory.join("pages.json"), "not json").unwrap();

    let wiki = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A"])
            .farm_article("Farm A", &[]),
    );

    let result = run_crawl_with(
        &config,
        "hash",
        &entry_points(&[], &["Category:Farming"]),
        wiki.clone(),
        CrawlOptions::default(),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(wiki.total_fetches(), 0);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let wiki = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A"])
            .farm_article("Farm A", &[]),
    );

    let cancel = CancellationToken::new();
    cancel.cancel();
    let options = CrawlOptions {
        fresh: false,
        cancel,
    };

    let report = run_crawl_with(
        &config,
        "hash",
        &entry_points(&[], &["Category:Farming"]),
        wiki.clone(),
        options,
    )
    .await
    .unwrap();

    assert_eq!(report.status(), RunStatus::Interrupted);
    assert_eq!(wiki.total_fetches(), 0);

    let checkpointer = FileCheckpointer::new(&config.output).unwrap();
    let stats = checkpointer.load_stats().unwrap().unwrap();
    assert_eq!(stats.status, RunStatus::Interrupted);
}

#[tokio::test]
async fn test_cancellation_between_batches_then_resume() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawler.batch_size = 1;
    config.crawler.concurrency = 1;
    let eps = entry_points(&[], &["Category:Farming"]);

    let cancel = CancellationToken::new();
    let first = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A", "Farm B", "Farm C"])
            .farm_article("Farm A", &[])
            .farm_article("Farm B", &[])
            .farm_article("Farm C", &[])
            .cancel_on("Farm A", cancel.clone()),
    );
    let options = CrawlOptions {
        fresh: false,
        cancel,
    };
    let report = run_crawl_with(&config, "hash", &eps, first.clone(), options)
        .await
        .unwrap();

    // The batch in flight finishes; the rest stays pending
    assert_eq!(report.status(), RunStatus::Interrupted);
    assert_eq!(report.pending, 2);
    assert_eq!(first.total_fetches(), 1);
    assert_eq!(report.stats.pages_accepted, 1);

    let second = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A", "Farm B", "Farm C"])
            .farm_article("Farm A", &[])
            .farm_article("Farm B", &[])
            .farm_article("Farm C", &[]),
    );
    let report = run_crawl_with(&config, "hash", &eps, second.clone(), CrawlOptions::default())
        .await
        .unwrap();

    assert_eq!(report.status(), RunStatus::Completed);
    assert_eq!(second.fetch_count("Farm A"), 0);
    assert_eq!(second.fetch_count("Farm B"), 1);
    assert_eq!(second.fetch_count("Farm C"), 1);
    assert_eq!(report.stats.pages_accepted, 3);
}

#[tokio::test]
async fn test_panicking_fetch_keeps_accepted_pages() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawler.concurrency = 1;

    let wiki = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A", "Farm B"])
            .farm_article("Farm A", &[])
            .farm_article("Farm B", &[])
            .panics("Farm B"),
    );

    let mut scheduler =
        CrawlScheduler::new(&config, wiki.clone(), "hash").with_checkpointers(vec![Box::new(
            FileCheckpointer::new(&config.output).unwrap(),
        )]);
    let report = scheduler
        .run(&entry_points(&[], &["Category:Farming"]))
        .await
        .unwrap();

    assert_eq!(report.status(), RunStatus::Completed);
    assert_eq!(report.stats.pages_accepted, 1);
    assert_eq!(report.stats.pages_failed, 1);
    assert_eq!(
        scheduler.registry().state_of(&title("Farm B")),
        Some(NodeState::Failed)
    );

    let checkpointer = FileCheckpointer::new(&config.output).unwrap();
    assert_eq!(stored_titles(&checkpointer), vec!["Farm A"]);
    assert_eq!(
        checkpointer.load_stats().unwrap().unwrap().status,
        RunStatus::Completed
    );
}

/// Checkpointer that counts its calls and always fails
struct FailingCheckpointer {
    calls: Arc<AtomicUsize>,
}

impl Checkpointer for FailingCheckpointer {
    fn name(&self) -> &str {
        "failing"
    }

    fn checkpoint(&self, _pages: &[Arc<ScrapedPage>], _stats: &RunStatistics) -> OutputResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(OutputError::Format("disk full".to_string()))
    }
}

#[tokio::test]
async fn test_failing_checkpointer_does_not_stop_crawl() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.crawler.batch_size = 1;

    let wiki = Arc::new(
        MemoryWiki::new()
            .category("Category:Farming", &["Farm A", "Farm B", "Farm C"])
            .farm_article("Farm A", &[])
            .farm_article("Farm B", &[])
            .farm_article("Farm C", &[]),
    );

    let calls = Arc::new(AtomicUsize::new(0));
    let failing = FailingCheckpointer {
        calls: Arc::clone(&calls),
    };
    let mut scheduler = CrawlScheduler::new(&config, wiki.clone(), "hash")
        .with_checkpointers(vec![Box::new(failing)]);
    let report = scheduler
        .run(&entry_points(&[], &["Category:Farming"]))
        .await
        .unwrap();

    assert_eq!(report.status(), RunStatus::Completed);
    assert_eq!(wiki.total_fetches(), 3);
    assert_eq!(report.stats.pages_accepted, 3);
    assert_eq!(report.stats.batches, 3);
    // One attempt per batch plus the final one
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}
