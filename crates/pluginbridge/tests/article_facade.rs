use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pluginbridge::ArticleFacade;
use pluginbridge::app::messages::HostMessage;
use pluginbridge::infra::recording::RecordingHost;
use serde_json::{Value, json};

fn setup() -> (Arc<RecordingHost>, ArticleFacade) {
    let host = Arc::new(RecordingHost::new("gallery"));
    let article = ArticleFacade::new(host.clone());
    (host, article)
}

fn assert_last(host: &RecordingHost, message: HostMessage, payload: Value) {
    let (name, sent) = host.last_request().expect("a request was sent");
    assert_eq!(name, message.as_str());
    assert!(message.shape().matches(&sent), "{name} sent {sent}");
    assert_eq!(sent, payload);
}

#[tokio::test]
async fn operations_send_documented_envelopes() {
    let (host, article) = setup();

    article.start_app("gallery", json!({"mode": "edit"})).await.unwrap();
    assert_last(
        &host,
        HostMessage::AppStart,
        json!({"app": "gallery", "option": {"mode": "edit"}}),
    );

    article.stop_app("gallery").await.unwrap();
    assert_last(&host, HostMessage::AppStop, json!({"app": "gallery"}));

    article.get_id().await.unwrap();
    assert_last(&host, HostMessage::ArticleIdGet, Value::Null);

    article.clear_meta_info().await.unwrap();
    assert_last(&host, HostMessage::MetaInfoClear, Value::Null);

    article.get_tags().await.unwrap();
    assert_last(&host, HostMessage::TagsGet, Value::Null);

    article.set_tags(json!(["a", "b"])).await.unwrap();
    assert_last(&host, HostMessage::TagsSet, json!({"tags": ["a", "b"]}));

    article.add_tag(json!("c")).await.unwrap();
    assert_last(&host, HostMessage::TagsAdd, json!({"tag": "c"}));

    article.remove_tag(json!("c")).await.unwrap();
    assert_last(&host, HostMessage::TagsRemove, json!({"tag": "c"}));

    article.get_selected_categories().await.unwrap();
    assert_last(&host, HostMessage::SelectedCategoriesGet, Value::Null);

    article.set_categories(json!([1, 2])).await.unwrap();
    assert_last(
        &host,
        HostMessage::SelectedCategoriesSet,
        json!({"categories": [1, 2]}),
    );

    article.add_categories(json!([3])).await.unwrap();
    assert_last(&host, HostMessage::CategoriesAdd, json!({"categories": [3]}));

    article.remove_categories(json!([3])).await.unwrap();
    assert_last(
        &host,
        HostMessage::CategoriesRemove,
        json!({"categories": [3]}),
    );

    article.set_main_category(json!(2)).await.unwrap();
    assert_last(&host, HostMessage::MainCategorySet, json!({"category": 2}));

    article.get_source().await.unwrap();
    assert_last(&host, HostMessage::SourceGet, Value::Null);

    article.set_source("NTB").await.unwrap();
    assert_last(&host, HostMessage::SourceSet, json!({"source": "NTB"}));

    article.get_status().await.unwrap();
    assert_last(&host, HostMessage::StatusGet, Value::Null);

    article.set_status("draft").await.unwrap();
    assert_last(&host, HostMessage::StatusSet, json!({"status": "draft"}));

    article.get_published_datetime().await.unwrap();
    assert_last(&host, HostMessage::PublishedGet, Value::Null);

    article
        .set_published_datetime("2024-05-01 12:00:00")
        .await
        .unwrap();
    assert_last(
        &host,
        HostMessage::PublishedSet,
        json!({"published": "2024-05-01 12:00:00"}),
    );

    article.get_authors().await.unwrap();
    assert_last(&host, HostMessage::AuthorsGet, Value::Null);

    article.set_authors(json!(["Ada"])).await.unwrap();
    assert_last(&host, HostMessage::AuthorsSet, json!({"authors": ["Ada"]}));

    article.add_authors(json!(["Bo"])).await.unwrap();
    assert_last(&host, HostMessage::AuthorsAdd, json!({"authors": ["Bo"]}));

    article.remove_authors(json!(["Bo"])).await.unwrap();
    assert_last(&host, HostMessage::AuthorsRemove, json!({"authors": ["Bo"]}));

    article.get_current_content().await.unwrap();
    assert_last(&host, HostMessage::ContentGet, Value::Null);

    article.set_current_content("<p>body</p>").await.unwrap();
    assert_last(
        &host,
        HostMessage::ContentSet,
        json!({"content": "<p>body</p>"}),
    );

    article.get_articletype_id().await.unwrap();
    assert_last(&host, HostMessage::TypeGet, Value::Null);

    article.set_articletype_id(json!(3)).await.unwrap();
    assert_last(&host, HostMessage::TypeSet, json!({"articletype": 3}));

    article.restore_app_window().await.unwrap();
    assert_last(&host, HostMessage::RestoreAppWindow, json!({}));
}

#[tokio::test]
async fn status_and_published_date_are_distinct() {
    let (host, article) = setup();
    host.respond("article-status-get", json!("draft"));
    host.respond("article-published-get", json!("2024-05-01 12:00:00"));

    assert_eq!(article.get_status().await.unwrap(), json!("draft"));
    assert_eq!(
        article.get_published_datetime().await.unwrap(),
        json!("2024-05-01 12:00:00")
    );
}

#[tokio::test]
async fn save_categories_persists_current_selection() {
    let (host, article) = setup();
    host.respond("article-categories-selected-get", json!([4, 8]));
    host.respond("article-categories-selected-set", json!(true));

    assert_eq!(article.save_categories().await.unwrap(), json!(true));

    let requests = host.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].0, "article-categories-selected-get");
    assert_eq!(
        requests[1],
        (
            "article-categories-selected-set".to_string(),
            json!({"categories": [4, 8]})
        )
    );
}

#[tokio::test]
async fn save_categories_stops_when_reading_fails() {
    let (host, article) = setup();
    host.fail("article-categories-selected-get", "no article open");

    let err = article.save_categories().await.unwrap_err();
    assert!(format!("{err:#}").contains("no article open"));
    assert_eq!(host.requests().len(), 1);
}

#[tokio::test]
async fn maximize_registers_close_listener() {
    let (host, article) = setup();
    let closed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&closed);

    let event = article
        .maximize_app_window(
            "Gallery",
            Arc::new(move |_: Value| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .await
        .unwrap();

    assert!(event.starts_with("editor-pane-close-"));
    assert_last(
        &host,
        HostMessage::PaneMaximize,
        json!({"title": "Gallery", "event": event}),
    );
    assert_eq!(host.listener_count(&event), 1);

    host.emit(&event, Value::Null);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn refused_maximize_leaves_no_close_listener() {
    let (host, article) = setup();
    host.fail("editor-pane-maximize", "pane locked");

    let err = article
        .maximize_app_window("Gallery", Arc::new(|_: Value| {}))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("pane locked"));
    let (_, sent) = host.last_request().expect("maximize was attempted");
    let event = sent["event"].as_str().expect("event name was sent");
    assert!(event.starts_with("editor-pane-close-"));
    assert_eq!(host.listener_count(event), 0);
    assert!(host.listened_events().is_empty());
}
