//! End-to-end runs against a local HTTP stub standing in for the
//! GeoNames distribution point.

mod common;

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use common::Fixture;
use geonames_to_sqlite::config::PipelineConfig;
use geonames_to_sqlite::download::{FetchOutcome, GeoNamesClient};
use geonames_to_sqlite::{CitySize, Pipeline, SilentUi};

const CITIES: CitySize = CitySize::Cities1000;

struct Stub {
    base_url: String,
    hits: Arc<AtomicUsize>,
}

impl Stub {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serve `files` by path; anything else is a 404
fn serve(files: HashMap<String, Vec<u8>>) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let files = Arc::new(files);
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let files = Arc::clone(&files);
            let counter = Arc::clone(&counter);
            thread::spawn(move || handle(stream, &files, &counter));
        }
    });

    Stub {
        base_url: format!("http://{}/dump/", addr),
        hits,
    }
}

fn handle(mut stream: TcpStream, files: &HashMap<String, Vec<u8>>, hits: &AtomicUsize) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).unwrap() <= 2 {
            break;
        }
    }
    hits.fetch_add(1, Ordering::SeqCst);

    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .trim_start_matches("/dump/");

    let (status, body): (&str, &[u8]) = match files.get(path) {
        Some(body) => ("200 OK", body.as_slice()),
        None => ("404 Not Found", &b""[..]),
    };
    write!(
        stream,
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    )
    .unwrap();
    stream.write_all(body).unwrap();
    stream.flush().unwrap();
}

fn client() -> GeoNamesClient {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    GeoNamesClient::with_client(client)
}

fn dumps(fixture: &Fixture) -> HashMap<String, Vec<u8>> {
    HashMap::from([
        (
            "countryInfo.txt".to_string(),
            fixture.country_txt.clone().into_bytes(),
        ),
        (
            "admin1CodesASCII.txt".to_string(),
            fixture.admin1_txt.clone().into_bytes(),
        ),
        (
            CITIES.archive_name(),
            fixture.cities_zip(&CITIES.text_name()),
        ),
    ])
}

fn config(stub: &Stub, work_dir: &std::path::Path) -> PipelineConfig {
    let mut config = PipelineConfig::new(work_dir).unwrap();
    config.cities = CITIES;
    config.base_url = stub.base_url.clone();
    config
}

#[test]
fn test_sync_downloads_then_skips() {
    let fixture = Fixture::generate();
    let stub = serve(dumps(&fixture));
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(config(&stub, dir.path()));
    let client = client();

    let outcomes = pipeline.fetch(&client, &mut SilentUi::new()).unwrap();
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, FetchOutcome::Downloaded { bytes } if *bytes > 0)));
    assert_eq!(stub.hits(), 3);
    assert_eq!(
        std::fs::read_to_string(dir.path().join(CITIES.text_name())).unwrap(),
        fixture.cities_txt
    );

    // Second run: everything on disk, no requests, fresh database
    let db_path = dir.path().join("geonames.db");
    let summary = pipeline
        .run(&client, &db_path, &mut SilentUi::new())
        .unwrap();
    assert_eq!(stub.hits(), 3);
    assert_eq!(
        summary.load("geoname").unwrap().inserted,
        fixture.places.len() as u64
    );

    let outcomes = pipeline.fetch(&client, &mut SilentUi::new()).unwrap();
    assert_eq!(outcomes, vec![FetchOutcome::Skipped; 3]);
    assert_eq!(stub.hits(), 3);
}

#[test]
fn test_http_error_is_fatal_and_leaves_no_file() {
    let fixture = Fixture::generate();
    let mut files = dumps(&fixture);
    files.remove("admin1CodesASCII.txt");
    let stub = serve(files);
    let dir = tempfile::tempdir().unwrap();

    let err = Pipeline::new(config(&stub, dir.path()))
        .fetch(&client(), &mut SilentUi::new())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("admin1CodesASCII.txt"));

    assert!(!dir.path().join("admin1CodesASCII.txt").exists());
    // The other transfers still ran to completion
    assert!(dir.path().join("countryInfo.txt").exists());
    assert!(dir.path().join(CITIES.archive_name()).exists());
    // Extraction never started
    assert!(!dir.path().join(CITIES.text_name()).exists());
}
