use anyhow::Result;
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::io::Read;
use tempfile::TempDir;
use weibo_topic_scraper::core::Storage;
use weibo_topic_scraper::{
    EtlEngine, LocalStorage, PostRecord, ScrapeState, TomlConfig, TopicPipeline,
};

const API_PATH: &str = "/api/container/getIndex";

fn post_card(name: &str, verified: bool, pics: &[&str]) -> Value {
    let pics: Vec<Value> = pics.iter().map(|url| json!({"url": url})).collect();
    json!({
        "card_type": 9,
        "mblog": {
            "user": {"screen_name": name, "verified": verified},
            "text": format!("<a href=\"/n/{0}\">@{0}</a> 分享了 #南京理工大学#", name),
            "created_at": "Fri Mar 07 11:10:00 +0800 2025",
            "reposts_count": 1,
            "comments_count": 2,
            "attitudes_count": 3,
            "pics": pics
        }
    })
}

fn page(cards: Vec<Value>) -> Value {
    json!({"ok": 1, "data": {"cards": cards}})
}

fn config(server: &MockServer, output_path: &str, max_pages: u32, formats: &str) -> Result<TomlConfig> {
    let normalized_path = output_path.replace('\\', "/");
    let config = TomlConfig::from_toml_str(&format!(
        r#"
[source]
endpoint = "{}"
container_id = "topic"

[scrape]
max_pages = {}
page_delay_ms = 0

[load]
output_path = "{}"
output_formats = {}
"#,
        server.url(API_PATH),
        max_pages,
        normalized_path,
        formats
    ))?;
    Ok(config)
}

fn read_sheet(path: &std::path::Path) -> Result<String> {
    let mut archive = zip::ZipArchive::new(std::fs::File::open(path)?)?;
    let mut sheet = archive.by_name("xl/worksheets/sheet1.xml")?;
    let mut content = String::new();
    sheet.read_to_string(&mut content)?;
    Ok(content)
}

/// 兩頁有資料、第三頁為空：抓三次後停止並輸出四筆
#[tokio::test]
async fn test_end_to_end_stops_on_empty_page() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let page1 = server.mock(|when, then| {
        when.method(GET).path(API_PATH).query_param("page", "1");
        then.status(200).json_body(page(vec![
            post_card("甲", true, &["https://wx1.sinaimg.cn/a.jpg", "https://wx1.sinaimg.cn/b.jpg"]),
            json!({"card_type": 11, "card_group": []}),
            post_card("乙", false, &[]),
        ]));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET).path(API_PATH).query_param("page", "2");
        then.status(200).json_body(page(vec![
            post_card("丙", false, &[]),
            post_card("丁", true, &["https://wx2.sinaimg.cn/c.jpg"]),
        ]));
    });
    let page3 = server.mock(|when, then| {
        when.method(GET).path(API_PATH).query_param("page", "3");
        then.status(200).json_body(page(vec![]));
    });

    let config = config(&server, &output_path, 10, r#"["json", "xlsx"]"#)?;
    let pipeline = TopicPipeline::new(LocalStorage::new(output_path.clone()), config)?;
    let engine = EtlEngine::new(pipeline);

    let summary = engine.run().await?;

    page1.assert_hits(1);
    page2.assert_hits(1);
    page3.assert_hits(1);
    assert_eq!(summary.record_count, 4);
    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.final_state, ScrapeState::StoppedEmpty);
    assert_eq!(summary.written_files.len(), 2);

    // JSON 讀回後欄位一致且順序與抓取順序相同
    let json_bytes = std::fs::read(temp_dir.path().join("weibo_data.json"))?;
    let records: Vec<PostRecord> = serde_json::from_slice(&json_bytes)?;
    let names: Vec<&str> = records.iter().map(|r| r.author_name.as_str()).collect();
    assert_eq!(names, vec!["甲", "乙", "丙", "丁"]);
    assert_eq!(records[0].body_text, "@甲 分享了 #南京理工大学#");
    assert_eq!(records[0].published_at, "Fri Mar 07 11:10:00 +0800 2025");
    assert_eq!(records[0].image_urls.len(), 2);
    assert_eq!(records[3].like_count, 3);

    let json_text = String::from_utf8(json_bytes)?;
    assert!(json_text.contains("南京理工大学"));

    let sheet = read_sheet(&temp_dir.path().join("weibo_data.xlsx"))?;
    assert_eq!(sheet.matches("<row ").count(), 5);
    assert!(sheet.contains("https://wx1.sinaimg.cn/a.jpg\nhttps://wx1.sinaimg.cn/b.jpg"));
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_stops_at_page_limit() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(API_PATH);
        then.status(200)
            .json_body(page(vec![post_card("甲", false, &[])]));
    });

    let config = config(&server, &output_path, 2, r#"["json"]"#)?;
    let pipeline = TopicPipeline::new(LocalStorage::new(output_path.clone()), config)?;

    let summary = EtlEngine::new(pipeline).run().await?;

    api_mock.assert_hits(2);
    assert_eq!(summary.final_state, ScrapeState::Done);
    assert_eq!(summary.record_count, 2);
    Ok(())
}

/// 第二頁失敗時，第一頁已累積的資料仍然輸出
#[tokio::test]
async fn test_end_to_end_with_api_failure_keeps_partial_data() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(API_PATH).query_param("page", "1");
        then.status(200)
            .json_body(page(vec![post_card("甲", false, &[])]));
    });
    let failing = server.mock(|when, then| {
        when.method(GET).path(API_PATH).query_param("page", "2");
        then.status(500);
    });

    let config = config(&server, &output_path, 5, r#"["json", "csv"]"#)?;
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = TopicPipeline::new(storage.clone(), config)?;

    let summary = EtlEngine::new(pipeline).run().await?;

    failing.assert_hits(1);
    assert_eq!(summary.final_state, ScrapeState::StoppedFetchFailure);
    assert_eq!(summary.record_count, 1);

    let csv_bytes = storage.read_file("weibo_data.csv").await?;
    let csv_text = String::from_utf8(csv_bytes)?;
    assert!(csv_text.starts_with(
        "author_name,author_tier,body_text,published_at,repost_count,comment_count,like_count,image_urls"
    ));
    assert!(!temp_dir.path().join("weibo_data.xlsx").exists());
    Ok(())
}

#[tokio::test]
async fn test_no_data_writes_no_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(API_PATH);
        then.status(200).json_body(json!({"ok": 0, "msg": "这里还没有内容"}));
    });

    let config = config(&server, &output_path, 5, r#"["json", "xlsx"]"#)?;
    let pipeline = TopicPipeline::new(LocalStorage::new(output_path.clone()), config)?;

    let summary = EtlEngine::new(pipeline).run().await?;

    api_mock.assert_hits(1);
    assert_eq!(summary.final_state, ScrapeState::StoppedNoData);
    assert_eq!(summary.record_count, 0);
    assert!(summary.written_files.is_empty());
    assert!(!temp_dir.path().join("weibo_data.json").exists());
    assert!(!temp_dir.path().join("weibo_data.xlsx").exists());
    Ok(())
}

#[tokio::test]
async fn test_existing_output_is_overwritten() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    std::fs::write(temp_dir.path().join("weibo_data.json"), "stale")?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(API_PATH);
        then.status(200)
            .json_body(page(vec![post_card("甲", false, &[])]));
    });

    let config = config(&server, &output_path, 1, r#"["json"]"#)?;
    let pipeline = TopicPipeline::new(LocalStorage::new(output_path.clone()), config)?;

    EtlEngine::new(pipeline).run().await?;

    let records: Vec<PostRecord> =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join("weibo_data.json"))?)?;
    assert_eq!(records.len(), 1);
    Ok(())
}
