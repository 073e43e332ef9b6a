//! End-to-end crawl tests
//!
//! These tests run `Coordinator::run` over scripted sites and check the CSV
//! file it leaves behind.

use crate::fake_browser::{hotels, test_config, Event, FakeBrowser, Hotel, Location, Site};
use hotel_harvest::browser::BrowserError;
use hotel_harvest::crawler::Coordinator;
use hotel_harvest::output::ProgressObserver;
use hotel_harvest::record::CSV_HEADER;
use hotel_harvest::HarvestError;
use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Reads the output file back as (header, rows)
fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open output");
    let header = reader
        .headers()
        .expect("Failed to read header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .expect("Failed to read row")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    (header, rows)
}

fn names(rows: &[Vec<String>]) -> Vec<&str> {
    rows.iter().map(|row| row[0].as_str()).collect()
}

/// Observer sharing its log with the test
struct RecordingObserver {
    log: Rc<RefCell<Vec<String>>>,
}

impl ProgressObserver for RecordingObserver {
    fn start(&mut self, total: Option<u64>) {
        self.log.borrow_mut().push(format!("start {:?}", total));
    }

    fn advance(&mut self, label: &str) {
        self.log.borrow_mut().push(format!("advance {}", label));
    }

    fn finish(&mut self) {
        self.log.borrow_mut().push("finish".to_string());
    }
}

/// Log sink shared with a `tracing` subscriber
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_cap_stops_within_first_page() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Paris", Some(3), &output);

    let site = Site::new("Paris")
        .page(&hotels("Paris Hotel", 5))
        .page(&hotels("Paris Annex", 5));
    let browser = FakeBrowser::new(site);

    let report = Coordinator::new(&config, browser.clone())
        .unwrap()
        .run()
        .unwrap();

    let (header, rows) = read_csv(&output);
    assert_eq!(header, CSV_HEADER.to_vec());
    assert_eq!(
        names(&rows),
        vec!["Paris Hotel 1", "Paris Hotel 2", "Paris Hotel 3"]
    );
    assert_eq!(report.records_collected, 3);
    assert_eq!(report.rows_persisted, Some(3));
    assert_eq!(report.pages_visited, 0);

    // Only the consent button was clicked; pagination never started
    assert_eq!(browser.clicks(), vec![config.selectors.consent.clone()]);
    assert_eq!(browser.detail_navigations().len(), 3);
    assert!(browser.is_quit());
}

#[test]
fn test_rows_carry_summary_and_detail_fields() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Paris", None, &output);

    let mut ritz = Hotel::new("Ritz Paris", "/travel/hotels/entity/ritz");
    ritz.price = "$1,450".to_string();
    ritz.rating = "4.7".to_string();
    ritz.reviews = "3,512".to_string();
    ritz.location = "15 Pl. Vendôme, 75001 Paris".to_string();
    ritz.contact = "01 43 16 30 30".to_string();

    let site = Site::new("Paris").page(&[ritz]);
    Coordinator::new(&config, FakeBrowser::new(site))
        .unwrap()
        .run()
        .unwrap();

    let (_, rows) = read_csv(&output);
    assert_eq!(
        rows,
        vec![vec![
            "Ritz Paris".to_string(),
            "$1,450".to_string(),
            "4.7".to_string(),
            "3,512".to_string(),
            "15 Pl. Vendôme, 75001 Paris".to_string(),
            "01 43 16 30 30".to_string(),
            "https://www.google.com/travel/hotels/entity/ritz".to_string(),
        ]]
    );
}

#[test]
fn test_failed_detail_read_skips_listing() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Paris", None, &output);

    let listings = hotels("Paris Hotel", 5);
    let site = Site::new("Paris")
        .page(&listings)
        .failing_read(&listings[1]);
    let browser = FakeBrowser::new(site);

    let report = Coordinator::new(&config, browser.clone())
        .unwrap()
        .run()
        .unwrap();

    let (_, rows) = read_csv(&output);
    assert_eq!(
        names(&rows),
        vec!["Paris Hotel 1", "Paris Hotel 3", "Paris Hotel 4", "Paris Hotel 5"]
    );
    assert_eq!(report.records_collected, 4);

    // The browser is back on the list before every detail visit
    let visits = browser.detail_navigations();
    assert_eq!(visits.len(), 5);
    for (from, _) in &visits {
        assert_eq!(*from, Location::List(0));
    }
    assert_eq!(visits[2].1, listings[2].detail_url());
}

#[test]
fn test_duplicates_across_pages_written_once() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Lisbon", None, &output);

    let original = Hotel::new("Pestana Palace", "/travel/hotels/entity/pestana");
    let relisted = Hotel::new("Pestana Palace", "/travel/hotels/entity/pestana?ts=2");
    let others = hotels("Lisbon Inn", 2);

    let site = Site::new("Lisbon")
        .page(&[original, others[0].clone()])
        .page(&[relisted, others[1].clone()]);

    let report = Coordinator::new(&config, FakeBrowser::new(site))
        .unwrap()
        .run()
        .unwrap();

    let (_, rows) = read_csv(&output);
    assert_eq!(
        names(&rows),
        vec!["Pestana Palace", "Lisbon Inn 1", "Lisbon Inn 2"]
    );
    assert_eq!(report.records_collected, 3);
    assert_eq!(report.pages_visited, 1);
}

#[test]
fn test_header_written_once_over_many_pages() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Rome", None, &output);

    let site = Site::new("Rome")
        .page(&hotels("Rome A", 2))
        .page(&hotels("Rome B", 2))
        .page(&hotels("Rome C", 2));
    let browser = FakeBrowser::new(site);

    let report = Coordinator::new(&config, browser.clone())
        .unwrap()
        .run()
        .unwrap();

    let content = fs::read_to_string(&output).unwrap();
    let header_line = CSV_HEADER.join(",");
    assert_eq!(
        content.lines().filter(|line| *line == header_line).count(),
        1
    );
    assert!(content.starts_with(&header_line));

    let (_, rows) = read_csv(&output);
    assert_eq!(rows.len(), 6);
    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.result_pages(), 3);
}

#[test]
fn test_pagination_uses_first_then_subsequent_locator() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Rome", None, &output);

    let site = Site::new("Rome")
        .page(&hotels("Rome A", 1))
        .page(&hotels("Rome B", 1))
        .page(&hotels("Rome C", 1));
    let browser = FakeBrowser::new(site);

    Coordinator::new(&config, browser.clone())
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(
        browser.clicks(),
        vec![
            config.selectors.consent.clone(),
            config.selectors.next_first.clone(),
            config.selectors.next_subsequent.clone(),
        ]
    );
    assert_eq!(browser.current(), Location::List(2));
}

#[test]
fn test_cap_reached_on_second_page() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Berlin", Some(3), &output);

    let site = Site::new("Berlin")
        .page(&hotels("Berlin A", 2))
        .page(&hotels("Berlin B", 2))
        .page(&hotels("Berlin C", 2));
    let browser = FakeBrowser::new(site);

    let report = Coordinator::new(&config, browser.clone())
        .unwrap()
        .run()
        .unwrap();

    let (_, rows) = read_csv(&output);
    assert_eq!(
        names(&rows),
        vec!["Berlin A 1", "Berlin A 2", "Berlin B 1"]
    );
    assert_eq!(report.pages_visited, 1);

    // One page change, then the cap ends the run
    assert_eq!(browser.clicks().len(), 2);
}

#[test]
fn test_zero_cap_writes_header_only() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Paris", Some(0), &output);

    let browser = FakeBrowser::new(Site::new("Paris").page(&hotels("Paris Hotel", 3)));

    let report = Coordinator::new(&config, browser.clone())
        .unwrap()
        .run()
        .unwrap();

    let (header, rows) = read_csv(&output);
    assert_eq!(header, CSV_HEADER.to_vec());
    assert!(rows.is_empty());
    assert_eq!(report.rows_persisted, Some(0));

    // The browser was never pointed anywhere
    assert!(!browser
        .events()
        .iter()
        .any(|event| matches!(event, Event::Navigate { .. })));
    assert!(browser.is_quit());
}

#[test]
fn test_no_listings_writes_header_only() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Nowhere", None, &output);

    let browser = FakeBrowser::new(Site::new("Nowhere").page(&[]));

    let report = Coordinator::new(&config, browser)
        .unwrap()
        .run()
        .unwrap();

    let (header, rows) = read_csv(&output);
    assert_eq!(header, CSV_HEADER.to_vec());
    assert!(rows.is_empty());
    assert_eq!(report.records_collected, 0);
}

#[test]
fn test_rerun_replaces_previous_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    fs::write(&output, "stale,data\nfrom,yesterday\n").unwrap();

    let config = test_config("Madrid", None, &output);
    let site = || Site::new("Madrid").page(&hotels("Madrid Hotel", 2));

    Coordinator::new(&config, FakeBrowser::new(site()))
        .unwrap()
        .run()
        .unwrap();
    let first = fs::read_to_string(&output).unwrap();
    assert!(!first.contains("yesterday"));

    Coordinator::new(&config, FakeBrowser::new(site()))
        .unwrap()
        .run()
        .unwrap();
    let second = fs::read_to_string(&output).unwrap();

    assert_eq!(first, second);
    let (_, rows) = read_csv(&output);
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_load_timeout_reloads_once() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Paris", None, &output);

    let site = Site::new("Paris")
        .page(&hotels("Paris Hotel", 2))
        .slow_first_load();
    let browser = FakeBrowser::new(site);

    let report = Coordinator::new(&config, browser.clone())
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(browser.count(&Event::Reload), 1);
    assert_eq!(report.records_collected, 2);
}

#[test]
fn test_card_without_link_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Paris", None, &output);

    let linked = Hotel::new("Hotel Lutetia", "/travel/hotels/entity/lutetia");
    let ghost = r#"<div class="BcKagd"><h2 class="BgYkof">Ghost Hotel</h2></div>"#;
    let site = Site::new("Paris").raw_page(ghost).page(&[linked]);
    let browser = FakeBrowser::new(site);

    Coordinator::new(&config, browser.clone())
        .unwrap()
        .run()
        .unwrap();

    let (_, rows) = read_csv(&output);
    assert_eq!(names(&rows), vec!["Hotel Lutetia"]);
    assert_eq!(browser.detail_navigations().len(), 1);
}

#[test]
fn test_observer_sees_every_accepted_record() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Paris", Some(2), &output);

    let log = Rc::new(RefCell::new(Vec::new()));
    let observer = RecordingObserver { log: log.clone() };

    let site = Site::new("Paris").page(&hotels("Paris Hotel", 4));
    Coordinator::new(&config, FakeBrowser::new(site))
        .unwrap()
        .with_observer(Box::new(observer))
        .run()
        .unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "start Some(2)".to_string(),
            "advance Paris Hotel 1".to_string(),
            "advance Paris Hotel 2".to_string(),
            "finish".to_string(),
        ]
    );
}

#[test]
fn test_navigation_failure_still_cleans_up() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Paris", None, &output);

    // The site serves a different search, so loading ours fails outright
    let browser = FakeBrowser::new(Site::new("Tokyo").page(&hotels("Tokyo Hotel", 2)));

    let result = Coordinator::new(&config, browser.clone()).unwrap().run();

    assert!(result.is_err());
    assert!(browser.is_quit());

    let (header, rows) = read_csv(&output);
    assert_eq!(header, CSV_HEADER.to_vec());
    assert!(rows.is_empty());
}

#[test]
fn test_each_page_is_flushed_before_the_next() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Rome", None, &output);

    let site = Site::new("Rome")
        .page(&hotels("Rome A", 2))
        .page(&hotels("Rome B", 3))
        .page(&hotels("Rome C", 1))
        .watch_output(&output);
    let browser = FakeBrowser::new(site);

    Coordinator::new(&config, browser.clone())
        .unwrap()
        .run()
        .unwrap();

    // Page 1's rows are on disk before page 2 opens, page 2's before page 3
    assert_eq!(browser.rows_at_page_change(), vec![2, 5]);

    let (_, rows) = read_csv(&output);
    assert_eq!(rows.len(), 6);
}

#[test]
fn test_browser_crash_keeps_flushed_rows() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hotels.csv");
    let config = test_config("Vienna", None, &output);

    let site = Site::new("Vienna")
        .page(&hotels("Vienna A", 2))
        .page(&hotels("Vienna B", 2))
        .crash_on_page_change();
    let browser = FakeBrowser::new(site);

    let result = Coordinator::new(&config, browser.clone()).unwrap().run();

    assert!(matches!(
        result,
        Err(HarvestError::Browser(BrowserError::Closed))
    ));
    assert!(browser.is_quit());

    let (_, rows) = read_csv(&output);
    assert_eq!(names(&rows), vec!["Vienna A 1", "Vienna A 2"]);
}

#[test]
fn test_crawl_error_returned_and_output_error_logged() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let output = out_dir.join("hotels.csv");
    let config = test_config("Vienna", None, &output);

    // The crash also takes the output directory with it
    let site = Site::new("Vienna")
        .page(&hotels("Vienna A", 1))
        .page(&hotels("Vienna B", 1))
        .crash_on_page_change()
        .remove_on_crash(&out_dir);

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        Coordinator::new(&config, FakeBrowser::new(site))
            .unwrap()
            .run()
    });

    assert!(matches!(result, Err(HarvestError::Browser(_))));
    assert!(!output.exists());
    assert!(logs.contents().contains("Failed to finalize"));
}
