//! Integration tests against a local filesystem lake
//!
//! Tests the full end-to-end flow: raw JSON in a temp directory → pipelines →
//! Parquet table directories read back from disk

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::{Int32Type, Int64Type, TimestampMicrosecondType};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::json;
use songplay_lake::cli::{Cli, OutputFormat, PipelineArg, Runner};
use songplay_lake::config::{AwsCredentials, EtlConfig};
use songplay_lake::error::Error;
use songplay_lake::pipeline::{run_pipelines, PipelineContext, PipelineSelection};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

fn song(song_id: &str, title: &str, artist_id: &str, artist: &str, year: i64) -> String {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist,
        "song_id": song_id,
        "title": title,
        "duration": 200.5,
        "year": year,
    })
    .to_string()
}

fn event(page: &str, user_id: &str, level: &str, ts: i64, song: Option<&str>) -> String {
    json!({
        "artist": null,
        "auth": "Logged In",
        "firstName": "Walter",
        "gender": "M",
        "itemInSession": 3,
        "lastName": "Frye",
        "length": null,
        "level": level,
        "location": "San Francisco-Oakland-Hayward, CA",
        "method": "PUT",
        "page": page,
        "registration": 1_540_919_166_796.0_f64,
        "sessionId": 38,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (Macintosh)",
        "userId": user_id,
    })
    .to_string()
}

struct Lake {
    _dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl Lake {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input");
        let output = dir.path().join("output");

        write(
            &input.join("song_data/A/A/A/TRAAAAW128F429D538.json"),
            &song("SOMZWCG12A8C13C480", "I Didn't Mean To", "ARD7TVE1187B99BFB1", "Casual", 0),
        );
        write(
            &input.join("song_data/A/A/B/TRAABCL128F4286650.json"),
            &song("SOUPIRU12A6D4FA1E1", "Der Kleine Dompfaff", "ARJIE2Y1187B994AB7", "Line Renaud", 2004),
        );
        // Exact duplicate of the first song
        write(
            &input.join("song_data/A/B/A/TRABACN128F425B784.json"),
            &song("SOMZWCG12A8C13C480", "I Didn't Mean To", "ARD7TVE1187B99BFB1", "Casual", 0),
        );

        let day1 = [
            event("Home", "39", "free", 1_541_105_830_796, None),
            event("NextSong", "8", "free", 1_541_106_106_796, Some("Der Kleine Dompfaff")),
            event("NextSong", "8", "free", 1_541_106_106_796, Some("Der Kleine Dompfaff")),
        ]
        .join("\n");
        let day2 = [
            event("NextSong", "8", "paid", 1_541_121_934_796, Some("I Didn't Mean To")),
            event("NextSong", "26", "free", 1_541_121_934_796, Some("Not In Catalog")),
            event("Logout", "26", "free", 1_541_121_999_000, None),
        ]
        .join("\n");
        // One flat file and one under year/month directories
        write(&input.join("log_data/2018-11-01-events.json"), &day1);
        write(&input.join("log_data/2018/11/2018-11-02-events.json"), &day2);

        Self {
            _dir: dir,
            input,
            output,
        }
    }

    fn context(&self) -> PipelineContext {
        let config = EtlConfig::new(
            self.input.to_str().unwrap(),
            self.output.to_str().unwrap(),
            AwsCredentials::default(),
        );
        PipelineContext::from_config(&config).unwrap()
    }

    fn table(&self, name: &str) -> PathBuf {
        self.output.join(name)
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read_parquet(path: &Path) -> RecordBatch {
    let file = fs::File::open(path).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
    arrow::compute::concat_batches(&batches[0].schema(), &batches).unwrap()
}

/// Every file under a directory, relative and sorted
fn files_under(root: &Path) -> Vec<String> {
    fn walk(dir: &Path, root: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                out.push(path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"));
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}

fn strings(batch: &RecordBatch, column: &str) -> Vec<Option<String>> {
    batch
        .column_by_name(column)
        .unwrap()
        .as_string::<i32>()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

async fn run_all(lake: &Lake) {
    run_pipelines(&lake.context(), &PipelineSelection::All.pipelines())
        .await
        .unwrap();
}

// ============================================================================
// Layout
// ============================================================================

#[tokio::test]
async fn test_table_directories_and_partitions() {
    let lake = Lake::new();
    run_all(&lake).await;

    assert_eq!(
        files_under(&lake.table("songs.parquet")),
        vec![
            "_SUCCESS",
            "year=0/artist_id=ARD7TVE1187B99BFB1/part-00000.parquet",
            "year=2004/artist_id=ARJIE2Y1187B994AB7/part-00000.parquet",
        ]
    );
    assert_eq!(
        files_under(&lake.table("artists.parquet")),
        vec!["_SUCCESS", "part-00000.parquet"]
    );
    assert_eq!(
        files_under(&lake.table("users.parquet")),
        vec!["_SUCCESS", "part-00000.parquet"]
    );
    assert_eq!(
        files_under(&lake.table("time.parquet")),
        vec!["_SUCCESS", "year=2018/month=11/part-00000.parquet"]
    );
    assert_eq!(
        files_under(&lake.table("songplays.parquet")),
        vec![
            "_SUCCESS",
            "artist_id=ARD7TVE1187B99BFB1/part-00000.parquet",
            "artist_id=ARJIE2Y1187B994AB7/part-00000.parquet",
        ]
    );
}

#[tokio::test]
async fn test_partition_columns_not_in_data_files() {
    let lake = Lake::new();
    run_all(&lake).await;

    let songs = read_parquet(
        &lake
            .table("songs.parquet")
            .join("year=2004/artist_id=ARJIE2Y1187B994AB7/part-00000.parquet"),
    );
    let names: Vec<String> = songs
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    assert_eq!(names, vec!["song_id", "title", "duration"]);
    assert_eq!(strings(&songs, "title"), vec![Some("Der Kleine Dompfaff".to_string())]);
}

// ============================================================================
// Table contents
// ============================================================================

#[tokio::test]
async fn test_duplicate_songs_collapsed() {
    let lake = Lake::new();
    run_all(&lake).await;

    let songs = read_parquet(
        &lake
            .table("songs.parquet")
            .join("year=0/artist_id=ARD7TVE1187B99BFB1/part-00000.parquet"),
    );
    assert_eq!(songs.num_rows(), 1);

    let artists = read_parquet(&lake.table("artists.parquet").join("part-00000.parquet"));
    assert_eq!(artists.num_rows(), 2);
}

#[tokio::test]
async fn test_users_from_song_plays_only() {
    let lake = Lake::new();
    run_all(&lake).await;

    let users = read_parquet(&lake.table("users.parquet").join("part-00000.parquet"));
    let rows: Vec<(Option<String>, Option<String>)> = strings(&users, "user_id")
        .into_iter()
        .zip(strings(&users, "level"))
        .collect();

    // User 39 only visited Home; user 8 keeps both levels, newest first
    let mut ids: Vec<Option<String>> = rows.iter().map(|(id, _)| id.clone()).collect();
    ids.sort();
    assert_eq!(
        ids,
        vec![Some("26".to_string()), Some("8".to_string()), Some("8".to_string())]
    );
    let user_8: Vec<Option<String>> = rows
        .into_iter()
        .filter(|(id, _)| id.as_deref() == Some("8"))
        .map(|(_, level)| level)
        .collect();
    assert_eq!(user_8, vec![Some("paid".to_string()), Some("free".to_string())]);
}

#[tokio::test]
async fn test_time_row_for_reference_timestamp() {
    let lake = Lake::new();
    run_all(&lake).await;

    let time = read_parquet(
        &lake
            .table("time.parquet")
            .join("year=2018/month=11/part-00000.parquet"),
    );
    // Two distinct seconds across four song plays
    assert_eq!(time.num_rows(), 2);

    let start = time
        .column_by_name("start_time")
        .unwrap()
        .as_primitive::<TimestampMicrosecondType>();
    let idx = (0..time.num_rows())
        .find(|&i| start.value(i) == 1_541_121_934_000_000)
        .unwrap();

    let int = |name: &str| {
        time.column_by_name(name)
            .unwrap()
            .as_primitive::<Int32Type>()
            .value(idx)
    };
    assert_eq!(int("hour"), 1);
    assert_eq!(int("day"), 2);
    assert_eq!(int("week"), 44);
}

#[tokio::test]
async fn test_songplays_inner_join() {
    let lake = Lake::new();
    run_all(&lake).await;

    let first = read_parquet(
        &lake
            .table("songplays.parquet")
            .join("artist_id=ARJIE2Y1187B994AB7/part-00000.parquet"),
    );
    let second = read_parquet(
        &lake
            .table("songplays.parquet")
            .join("artist_id=ARD7TVE1187B99BFB1/part-00000.parquet"),
    );

    // "Not In Catalog" produces no row; the repeated play stays
    assert_eq!(first.num_rows(), 2);
    // The catalog is joined raw, so its duplicate record yields a second row
    assert_eq!(second.num_rows(), 2);
    assert_eq!(
        strings(&second, "level"),
        vec![Some("paid".to_string()), Some("paid".to_string())]
    );

    let mut ids: Vec<i64> = [&first, &second]
        .iter()
        .flat_map(|b| {
            let col = b
                .column_by_name("songplay_id")
                .unwrap()
                .as_primitive::<Int64Type>();
            (0..col.len()).map(|i| col.value(i)).collect::<Vec<_>>()
        })
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3]);
}

// ============================================================================
// Write modes
// ============================================================================

#[tokio::test]
async fn test_overwrite_rerun_is_identical() {
    let lake = Lake::new();
    run_all(&lake).await;

    let artists = lake.table("artists.parquet").join("part-00000.parquet");
    let before = fs::read(&artists).unwrap();
    run_all(&lake).await;
    let after = fs::read(&artists).unwrap();

    assert_eq!(before, after);
}

#[tokio::test]
async fn test_overwrite_removes_stale_partitions() {
    let lake = Lake::new();
    let stale = lake
        .table("songs.parquet")
        .join("year=1999/artist_id=AROLD/part-00000.parquet");
    write(&stale, "old");

    run_all(&lake).await;
    assert!(!stale.exists());
}

#[tokio::test]
async fn test_ignore_tables_keep_first_run() {
    let lake = Lake::new();
    run_all(&lake).await;
    let users = lake.table("users.parquet").join("part-00000.parquet");
    let before = fs::read(&users).unwrap();

    write(
        &lake.input.join("log_data/2018-11-03-events.json"),
        &event("NextSong", "99", "paid", 1_541_200_000_000, Some("Der Kleine Dompfaff")),
    );
    let reports = run_pipelines(&lake.context(), &PipelineSelection::Logs.pipelines())
        .await
        .unwrap();

    assert!(reports[0].tables.iter().all(|t| t.skipped));
    assert_eq!(fs::read(&users).unwrap(), before);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_missing_song_data_is_error() {
    let lake = Lake::new();
    fs::remove_dir_all(lake.input.join("song_data")).unwrap();

    let err = run_pipelines(&lake.context(), &PipelineSelection::Songs.pipelines())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[tokio::test]
async fn test_malformed_log_line_is_error() {
    let lake = Lake::new();
    write(&lake.input.join("log_data/bad.json"), "{\"page\": \"NextSong\",");

    let err = run_pipelines(&lake.context(), &PipelineSelection::Logs.pipelines())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RecordParse { .. }));
}

// ============================================================================
// CLI runner
// ============================================================================

#[tokio::test]
async fn test_runner_with_config_file() {
    let lake = Lake::new();
    let config = lake.input.parent().unwrap().join("dl.cfg");
    fs::write(
        &config,
        format!(
            "[AWS]\nAWS_ACCESS_KEY_ID=AKIAEXAMPLE\nAWS_SECRET_ACCESS_KEY=secret\n\n\
             [PATHS]\nINPUT_DATA={}\nOUTPUT_DATA={}\n",
            lake.input.display(),
            lake.output.display()
        ),
    )
    .unwrap();

    let runner = Runner::new(Cli {
        config,
        pipeline: PipelineArg::Songs,
        format: OutputFormat::Json,
        verbose: false,
    });
    runner.run().await.unwrap();

    assert!(lake.table("songs.parquet").join("_SUCCESS").is_file());
    assert!(!lake.table("users.parquet").exists());
}

#[tokio::test]
async fn test_runner_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Runner::new(Cli {
        config: dir.path().join("missing.cfg"),
        pipeline: PipelineArg::All,
        format: OutputFormat::Json,
        verbose: false,
    });
    let err = runner.run().await.unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}
