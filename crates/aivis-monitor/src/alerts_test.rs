use std::collections::BTreeMap;

use aivis_core::{CompetitorStats, Severity};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::*;
use crate::store::MemoryStore;
use crate::webhook::DeliveryOutcome;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, day).unwrap()
}

fn snapshot(brand_id: Uuid, day: u32, overall: u8) -> VisibilitySnapshot {
    VisibilitySnapshot {
        brand_id,
        date: date(day),
        chatgpt_score: Some(overall),
        perplexity_score: None,
        google_aio_score: None,
        overall_score: overall,
        sentiment_positive: 50.0,
        sentiment_neutral: 25.0,
        sentiment_negative: 25.0,
        total_mentions: 4,
        total_prompts_checked: 8,
        competitor_data: BTreeMap::new(),
    }
}

fn with_competitors(mut s: VisibilitySnapshot, names: &[&str]) -> VisibilitySnapshot {
    for name in names {
        s.competitor_data.insert(
            (*name).to_string(),
            CompetitorStats {
                mentions: 1,
                ..CompetitorStats::default()
            },
        );
    }
    s
}

fn types(events: &[AlertEvent]) -> Vec<AlertType> {
    events.iter().map(|e| e.alert_type).collect()
}

#[test]
fn drop_from_80_to_65_triggers() {
    let brand = Uuid::new_v4();
    let prev = snapshot(brand, 1, 80);
    let curr = snapshot(brand, 2, 65);

    let events = detect_alerts(&AlertSettings::default(), &curr, Some(&prev));

    assert_eq!(types(&events), vec![AlertType::VisibilityDrop]);
    assert_eq!(events[0].severity, Severity::Warning);
    assert_eq!(events[0].metadata["drop_pct"], 18.75);
    assert!(events[0].title.starts_with("Visibility dropped"));
}

#[test]
fn drop_from_80_to_75_does_not_trigger() {
    let brand = Uuid::new_v4();
    let prev = snapshot(brand, 1, 80);
    let curr = snapshot(brand, 2, 75);

    assert!(detect_alerts(&AlertSettings::default(), &curr, Some(&prev)).is_empty());
}

#[test]
fn drop_of_exactly_ten_percent_does_not_trigger() {
    let brand = Uuid::new_v4();
    let prev = snapshot(brand, 1, 80);
    let curr = snapshot(brand, 2, 72);

    assert!(detect_alerts(&AlertSettings::default(), &curr, Some(&prev)).is_empty());
}

#[test]
fn zero_baseline_score_never_triggers_drop() {
    let brand = Uuid::new_v4();
    let prev = snapshot(brand, 1, 0);
    let curr = snapshot(brand, 2, 0);

    assert!(detect_alerts(&AlertSettings::default(), &curr, Some(&prev)).is_empty());
}

#[test]
fn no_baseline_means_no_alerts() {
    let brand = Uuid::new_v4();
    let mut curr = with_competitors(snapshot(brand, 2, 10), &["Globex"]);
    curr.total_mentions = 100;

    assert!(detect_alerts(&AlertSettings::default(), &curr, None).is_empty());
}

#[test]
fn new_mention_requires_strict_increase() {
    let brand = Uuid::new_v4();
    let prev = snapshot(brand, 1, 60);
    let mut curr = snapshot(brand, 2, 60);

    assert!(detect_alerts(&AlertSettings::default(), &curr, Some(&prev)).is_empty());

    curr.total_mentions = 5;
    let events = detect_alerts(&AlertSettings::default(), &curr, Some(&prev));
    assert_eq!(types(&events), vec![AlertType::NewMention]);
    assert_eq!(events[0].severity, Severity::Info);
}

#[test]
fn sentiment_shift_of_five_points_triggers() {
    let brand = Uuid::new_v4();
    let prev = snapshot(brand, 1, 60);
    let mut curr = snapshot(brand, 2, 60);
    curr.sentiment_positive = 45.0;
    curr.sentiment_neutral = 30.0;

    let events = detect_alerts(&AlertSettings::default(), &curr, Some(&prev));
    assert_eq!(types(&events), vec![AlertType::SentimentShift]);
    assert_eq!(events[0].severity, Severity::Warning);
    assert_eq!(events[0].metadata["positive_delta"], -5.0);
}

#[test]
fn negative_share_shift_alone_triggers() {
    let brand = Uuid::new_v4();
    let prev = snapshot(brand, 1, 60);
    let mut curr = snapshot(brand, 2, 60);
    curr.sentiment_neutral = 18.0;
    curr.sentiment_negative = 32.0;

    let events = detect_alerts(&AlertSettings::default(), &curr, Some(&prev));
    assert_eq!(types(&events), vec![AlertType::SentimentShift]);
}

#[test]
fn small_sentiment_moves_do_not_trigger() {
    let brand = Uuid::new_v4();
    let prev = snapshot(brand, 1, 60);
    let mut curr = snapshot(brand, 2, 60);
    curr.sentiment_positive = 53.0;
    curr.sentiment_negative = 22.0;

    assert!(detect_alerts(&AlertSettings::default(), &curr, Some(&prev)).is_empty());
}

#[test]
fn newly_appearing_competitors_are_listed() {
    let brand = Uuid::new_v4();
    let prev = with_competitors(snapshot(brand, 1, 60), &["Globex"]);
    let curr = with_competitors(snapshot(brand, 2, 60), &["Globex", "Initech", "Umbrella"]);

    let events = detect_alerts(&AlertSettings::default(), &curr, Some(&prev));

    assert_eq!(types(&events), vec![AlertType::CompetitorNew]);
    assert_eq!(
        events[0].body,
        "Newly appearing competitors: Initech, Umbrella."
    );
    assert_eq!(
        events[0].metadata["competitors"],
        serde_json::json!(["Initech", "Umbrella"])
    );
}

#[test]
fn disabled_checks_are_skipped() {
    let brand = Uuid::new_v4();
    let prev = with_competitors(snapshot(brand, 1, 80), &[]);
    let mut curr = with_competitors(snapshot(brand, 2, 40), &["Globex"]);
    curr.total_mentions = 9;

    let all = detect_alerts(&AlertSettings::default(), &curr, Some(&prev));
    assert_eq!(
        types(&all),
        vec![
            AlertType::VisibilityDrop,
            AlertType::NewMention,
            AlertType::CompetitorNew
        ]
    );

    let settings = AlertSettings {
        visibility_drop: false,
        competitor_new: false,
        ..AlertSettings::default()
    };
    let some = detect_alerts(&settings, &curr, Some(&prev));
    assert_eq!(types(&some), vec![AlertType::NewMention]);
}

#[derive(Default)]
struct RecordingNotifier {
    delivered: Mutex<Vec<(String, AlertType)>>,
}

#[async_trait]
impl AlertNotifier for RecordingNotifier {
    async fn deliver(&self, url: &str, event: &AlertEvent) -> DeliveryOutcome {
        self.delivered
            .lock()
            .await
            .push((url.to_string(), event.alert_type));
        DeliveryOutcome::Failed("recorded only".to_string())
    }
}

#[tokio::test]
async fn evaluation_uses_previous_snapshot_and_delivers_to_webhook() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::default();
    let brand = Uuid::new_v4();
    store.insert_snapshot(snapshot(brand, 1, 100)).await;
    store.insert_snapshot(snapshot(brand, 3, 80)).await;
    store.insert_snapshot(snapshot(brand, 4, 65)).await;
    store
        .set_alert_settings(
            brand,
            AlertSettings {
                webhook_url: Some("https://hooks.example.com/a".to_string()),
                ..AlertSettings::default()
            },
        )
        .await;

    let events = evaluate_alerts(&store, &notifier, brand, date(4))
        .await
        .unwrap();

    // Compared against day 3 (80), not day 1 (100).
    assert_eq!(types(&events), vec![AlertType::VisibilityDrop]);
    assert_eq!(events[0].metadata["previous_score"], 80);
    let delivered = notifier.delivered.lock().await;
    assert_eq!(
        *delivered,
        vec![(
            "https://hooks.example.com/a".to_string(),
            AlertType::VisibilityDrop
        )]
    );
}

#[tokio::test]
async fn every_triggered_event_is_delivered_even_when_delivery_fails() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::default();
    let brand = Uuid::new_v4();
    store.insert_snapshot(snapshot(brand, 1, 80)).await;
    let mut today = with_competitors(snapshot(brand, 2, 40), &["Globex"]);
    today.total_mentions = 9;
    store.insert_snapshot(today).await;
    store
        .set_alert_settings(
            brand,
            AlertSettings {
                webhook_url: Some("https://hooks.example.com/b".to_string()),
                ..AlertSettings::default()
            },
        )
        .await;

    let events = evaluate_alerts(&store, &notifier, brand, date(2))
        .await
        .unwrap();

    assert_eq!(events.len(), 3);
    let delivered: Vec<AlertType> = notifier
        .delivered
        .lock()
        .await
        .iter()
        .map(|(_, t)| *t)
        .collect();
    assert_eq!(delivered, types(&events));
}

#[tokio::test]
async fn first_snapshot_produces_no_alerts() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::default();
    let brand = Uuid::new_v4();
    store.insert_snapshot(snapshot(brand, 1, 20)).await;

    let events = evaluate_alerts(&store, &notifier, brand, date(1))
        .await
        .unwrap();

    assert!(events.is_empty());
    assert!(notifier.delivered.lock().await.is_empty());
}

#[tokio::test]
async fn no_webhook_means_no_delivery() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::default();
    let brand = Uuid::new_v4();
    store.insert_snapshot(snapshot(brand, 1, 80)).await;
    store.insert_snapshot(snapshot(brand, 2, 10)).await;

    let events = evaluate_alerts(&store, &notifier, brand, date(2))
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert!(notifier.delivered.lock().await.is_empty());
}

#[tokio::test]
async fn missing_snapshot_for_day_is_not_an_error() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::default();

    let events = evaluate_alerts(&store, &notifier, Uuid::new_v4(), date(9))
        .await
        .unwrap();

    assert!(events.is_empty());
}
