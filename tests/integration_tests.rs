use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use clipper_client::adapters::TracingLogAdapter;
use clipper_client::app::{AppContainer, DefaultAppContainer};
use clipper_client::ports::{ClipServicePort, LogEvent, LogLevel, LogPort};
use clipper_client::presenter::render::OutputFormat;
use clipper_client::presenter::*;
use clipper_client::session::interactive::InteractiveSession;
use clipper_client::session::{ClipForm, ClipperSession};
use clipper_client::*;

/// Test utilities for the clip flows
mod test_utils {
    use super::*;

    type Scripted<T> = Mutex<VecDeque<(Duration, Result<T, ClientError>)>>;

    /// Clip service answering from scripted queues and counting calls
    #[derive(Default)]
    pub struct FakeClipService {
        info_responses: Scripted<ResolvedVideo>,
        clip_responses: Scripted<ClipResult>,
        pub info_calls: AtomicUsize,
        pub clip_calls: AtomicUsize,
        pub download_calls: AtomicUsize,
        pub clip_requests: Mutex<Vec<ClipRequest>>,
    }

    impl FakeClipService {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn push_info(&self, response: Result<ResolvedVideo, ClientError>) {
            self.push_info_after(Duration::ZERO, response);
        }

        pub fn push_info_after(
            &self,
            delay: Duration,
            response: Result<ResolvedVideo, ClientError>,
        ) {
            self.info_responses.lock().unwrap().push_back((delay, response));
        }

        pub fn push_clip(&self, response: Result<ClipResult, ClientError>) {
            self.push_clip_after(Duration::ZERO, response);
        }

        pub fn push_clip_after(&self, delay: Duration, response: Result<ClipResult, ClientError>) {
            self.clip_responses.lock().unwrap().push_back((delay, response));
        }

        pub fn info_calls(&self) -> usize {
            self.info_calls.load(Ordering::SeqCst)
        }

        pub fn clip_calls(&self) -> usize {
            self.clip_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ClipServicePort for FakeClipService {
        async fn fetch_info(&self, _url: &SourceUrl) -> Result<ResolvedVideo, ClientError> {
            self.info_calls.fetch_add(1, Ordering::SeqCst);
            let (delay, response) = self
                .info_responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected metadata fetch");
            tokio::time::sleep(delay).await;
            response
        }

        async fn create_clip(&self, request: &ClipRequest) -> Result<ClipResult, ClientError> {
            self.clip_calls.fetch_add(1, Ordering::SeqCst);
            self.clip_requests.lock().unwrap().push(request.clone());
            let (delay, response) = self
                .clip_responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected clip request");
            tokio::time::sleep(delay).await;
            response
        }

        async fn download_artifact(
            &self,
            download_url: &str,
            destination: &Path,
        ) -> Result<u64, ClientError> {
            self.download_calls.fetch_add(1, Ordering::SeqCst);
            let body = format!("clip from {}", download_url);
            std::fs::write(destination, &body).map_err(|e| ClientError::Io(e.to_string()))?;
            Ok(body.len() as u64)
        }
    }

    /// Log port keeping every message it receives, tagged with its level
    #[derive(Default)]
    pub struct RecordingLog {
        pub lines: Mutex<Vec<(LogLevel, String)>>,
    }

    impl RecordingLog {
        fn record(&self, level: LogLevel, message: &str) {
            self.lines.lock().unwrap().push((level, message.to_string()));
        }

        pub fn at(&self, level: LogLevel) -> Vec<String> {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, m)| m.clone())
                .collect()
        }
    }

    #[async_trait]
    impl LogPort for RecordingLog {
        async fn info(&self, message: &str) {
            self.record(LogLevel::Info, message);
        }

        async fn warn(&self, message: &str) {
            self.record(LogLevel::Warn, message);
        }

        async fn error(&self, message: &str) {
            self.record(LogLevel::Error, message);
        }

        async fn debug(&self, message: &str) {
            self.record(LogLevel::Debug, message);
        }

        async fn log_event(&self, event: &LogEvent) {
            self.record(event.level, &event.message);
        }
    }

    pub fn container(service: &Arc<FakeClipService>) -> DefaultAppContainer {
        DefaultAppContainer::with_ports(
            Arc::clone(service) as Arc<dyn ClipServicePort>,
            Arc::new(TracingLogAdapter::new(LogLevel::Error)),
        )
    }

    pub fn demo_video() -> ResolvedVideo {
        ResolvedVideo {
            metadata: VideoMetadata {
                title: "Demo".to_string(),
                thumbnail_url: "https://x/t.jpg".to_string(),
                duration_seconds: 125,
            },
            qualities: vec![QualityOption::new("720p", "720p")],
        }
    }

    pub fn clip_result(url: &str) -> ClipResult {
        ClipResult::new(None, "10s", url)
    }

    pub fn remote(detail: Option<&str>) -> ClientError {
        ClientError::Remote {
            status: 400,
            detail: detail.map(str::to_string),
        }
    }

    pub fn filled_form() -> ClipForm {
        ClipForm {
            url: "https://x/video".to_string(),
            quality: Some("720p".to_string()),
            start_time: "0".to_string(),
            end_time: "10".to_string(),
        }
    }
}

use test_utils::*;

#[tokio::test]
async fn test_empty_url_makes_no_network_call() {
    let service = FakeClipService::new();
    let container = container(&service);

    let err = container.metadata_resolver().resolve("").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let mut session = ClipperSession::default();
    session.check(&container.metadata_resolver()).await;
    assert_eq!(
        session.metadata.status.error_message(),
        Some("Veuillez entrer une URL d'abord.")
    );
    assert!(session.metadata.control.enabled);

    assert_eq!(service.info_calls(), 0);
}

#[tokio::test]
async fn test_blank_url_is_left_to_the_service() {
    let service = FakeClipService::new();
    service.push_info(Err(remote(Some("Invalid URL"))));
    let container = container(&service);

    let mut session = ClipperSession::default();
    session.form.url = "   ".to_string();
    session.check(&container.metadata_resolver()).await;

    assert_eq!(service.info_calls(), 1);
    assert_eq!(session.metadata.status.error_message(), Some("Invalid URL"));
}

#[tokio::test]
async fn test_resolver_logs_offered_qualities_at_debug() {
    let service = FakeClipService::new();
    service.push_info(Ok(demo_video()));
    let log = Arc::new(RecordingLog::default());
    let container = DefaultAppContainer::with_ports(
        Arc::clone(&service) as Arc<dyn ClipServicePort>,
        Arc::clone(&log) as Arc<dyn LogPort>,
    );

    container.metadata_resolver().resolve("https://x/video").await.unwrap();

    assert_eq!(log.at(LogLevel::Debug), vec!["Offered qualities: [720p]".to_string()]);
    assert!(log.at(LogLevel::Info).contains(&"Metadata resolved".to_string()));
}

#[tokio::test]
async fn test_scenario_a_metadata_is_displayed() {
    let service = FakeClipService::new();
    service.push_info(Ok(demo_video()));
    let container = container(&service);

    let mut session = ClipperSession::default();
    session.form.url = "https://x/video".to_string();
    session.check(&container.metadata_resolver()).await;

    let metadata = session.metadata.metadata.as_ref().unwrap();
    assert_eq!(metadata.title, "Demo");
    assert_eq!(metadata.duration_label(), "Durée: 2m 5s");
    let labels: Vec<&str> = session.metadata.qualities.iter().map(|q| q.label.as_str()).collect();
    assert_eq!(labels, vec!["720p"]);
    assert_eq!(session.form.quality.as_deref(), Some("720p"));

    let text = session.metadata.to_string();
    assert!(text.contains("Demo\nDurée: 2m 5s\n"));
    assert_eq!(service.info_calls(), 1);
}

#[tokio::test]
async fn test_qualities_keep_response_order_and_count() {
    let service = FakeClipService::new();
    let options = vec![
        QualityOption::new("2160", "2160p (4K)"),
        QualityOption::new("1080", "1080p (HD)"),
        QualityOption::new("360", "360p"),
        QualityOption::new("audio", "Audio uniquement (MP3/M4A)"),
    ];
    let mut video = demo_video();
    video.qualities = options.clone();
    service.push_info(Ok(video));
    let container = container(&service);

    let resolved = container.metadata_resolver().resolve("https://x/video").await.unwrap();
    assert_eq!(resolved.qualities, options);
}

#[tokio::test]
async fn test_scenario_b_clip_result_is_presented() {
    let service = FakeClipService::new();
    service.push_clip(Ok(clip_result("https://x/clip.mp4")));
    let container = container(&service);

    let mut session = ClipperSession::default();
    session.form = filled_form();
    session.submit(&container.clip_requester()).await;

    assert_eq!(session.clip.player.src.as_deref(), Some("https://x/clip.mp4"));
    assert_eq!(session.clip.download_href.as_deref(), Some("https://x/clip.mp4"));
    assert_eq!(
        session.clip.status.visible_message(),
        Some(CLIP_SUCCESS_MESSAGE)
    );
    assert_eq!(session.clip.control.label, SUBMIT_IDLE_LABEL);

    let sent = service.clip_requests.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].quality.as_deref(), Some("720p"));
    assert_eq!(sent[0].start_time, "0");
    assert_eq!(sent[0].end_time, "10");
}

#[tokio::test]
async fn test_scenario_c_failure_leaves_quality_list_unchanged() {
    let service = FakeClipService::new();
    service.push_info(Ok(demo_video()));
    service.push_info(Err(remote(Some("Invalid URL"))));
    let container = container(&service);

    let mut session = ClipperSession::default();
    session.form.url = "https://x/video".to_string();
    session.check(&container.metadata_resolver()).await;
    let before = session.metadata.qualities.clone();

    session.form.url = "https://x/broken".to_string();
    session.check(&container.metadata_resolver()).await;

    assert_eq!(session.metadata.status.error_message(), Some("Invalid URL"));
    assert_eq!(session.metadata.qualities, before);
    assert!(session.metadata.control.enabled);
    assert_eq!(session.metadata.control.label, CHECK_IDLE_LABEL);
}

#[tokio::test]
async fn test_failure_messages_use_detail_or_fallback() {
    let service = FakeClipService::new();
    service.push_info(Err(remote(None)));
    service.push_clip(Err(remote(Some("End time must be greater than start time."))));
    service.push_clip(Err(ClientError::Transport("connection refused".to_string())));
    service.push_clip(Err(ClientError::Shape("missing field `download_url`".to_string())));
    let container = container(&service);

    let mut session = ClipperSession::default();
    session.form = filled_form();

    session.check(&container.metadata_resolver()).await;
    assert_eq!(session.metadata.status.error_message(), Some(INFO_FALLBACK_MESSAGE));

    let requester = container.clip_requester();
    session.submit(&requester).await;
    assert_eq!(
        session.clip.status.error_message(),
        Some("End time must be greater than start time.")
    );

    session.submit(&requester).await;
    assert_eq!(session.clip.status.error_message(), Some(CLIP_FALLBACK_MESSAGE));

    session.submit(&requester).await;
    assert_eq!(session.clip.status.error_message(), Some(CLIP_FALLBACK_MESSAGE));
    assert!(session.clip.visible_result().is_none());
    assert!(session.clip.control.enabled);
    assert_eq!(session.clip.control.label, SUBMIT_IDLE_LABEL);
}

#[tokio::test]
async fn test_new_submission_hides_previous_result_while_pending() {
    let service = FakeClipService::new();
    service.push_clip(Ok(clip_result("https://x/first.mp4")));
    let container = container(&service);

    let mut session = ClipperSession::default();
    session.form = filled_form();
    session.submit(&container.clip_requester()).await;
    assert!(session.clip.player.play());

    let pending = session.start_submit().unwrap();
    assert!(session.clip.visible_result().is_none());
    assert!(!session.clip.player.playing);
    assert_eq!(session.clip.player.src, None);
    assert!(!session.clip.control.enabled);

    session.finish_submit(pending.ticket, Err(remote(None)));
    assert!(session.clip.player.src.is_none());
    assert!(session.clip.control.enabled);
}

#[tokio::test]
async fn test_clip_without_fetched_metadata_sends_no_quality() {
    let service = FakeClipService::new();
    service.push_clip(Ok(clip_result("https://x/clip.mp4")));
    let container = container(&service);

    let mut session = ClipperSession::default();
    session.form.url = "https://x/video".to_string();
    session.form.start_time = "00:00:05".to_string();
    session.form.end_time = "00:00:20".to_string();
    session.submit(&container.clip_requester()).await;

    let sent = service.clip_requests.lock().unwrap();
    assert_eq!(sent[0].quality, None);
    assert_eq!(sent[0].start_time, "00:00:05");
}

#[tokio::test]
async fn test_save_writes_artifact() {
    let service = FakeClipService::new();
    let container = container(&service);
    let dir = tempfile::TempDir::new().unwrap();
    let target = dir.path().join("clip.mp4");

    let result = clip_result("https://x/clip.mp4");
    let bytes = container.clip_requester().save(&result, &target).await.unwrap();

    assert_eq!(bytes, std::fs::metadata(&target).unwrap().len());
    assert_eq!(service.download_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_interactive_session_runs_both_flows() {
    let service = FakeClipService::new();
    service.push_info(Ok(demo_video()));
    service.push_clip(Ok(clip_result("https://x/clip.mp4")));
    let container = container(&service);

    let input = b"url https://x/video\ncheck\nquality 720p\nstart 0\nend 10\nsubmit\nquit\n";
    let mut output = Vec::new();
    let mut interactive =
        InteractiveSession::new(&container, ClipperSession::default(), OutputFormat::Text);
    interactive.run(&input[..], &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("[⏳...] (désactivé)"));
    assert!(text.contains("Durée: 2m 5s"));
    assert!(text.contains(CLIP_SUCCESS_MESSAGE));
    assert!(text.contains("Télécharger: https://x/clip.mp4"));

    let session = interactive.session();
    assert_eq!(session.metadata.metadata.as_ref().unwrap().title, "Demo");
    assert_eq!(session.clip.download_href.as_deref(), Some("https://x/clip.mp4"));
    assert!(session.metadata.control.enabled);
    assert!(session.clip.control.enabled);
    assert_eq!(service.info_calls(), 1);
    assert_eq!(service.clip_calls(), 1);
}

#[tokio::test]
async fn test_interactive_last_response_wins_by_default() {
    let service = FakeClipService::new();
    service.push_clip_after(Duration::from_millis(60), Ok(clip_result("https://x/first.mp4")));
    service.push_clip(Ok(clip_result("https://x/second.mp4")));
    let container = container(&service);

    let input = b"url https://x/video\nsubmit\nsubmit\n";
    let mut output = Vec::new();
    let mut interactive =
        InteractiveSession::new(&container, ClipperSession::new(false), OutputFormat::Text);
    interactive.run(&input[..], &mut output).await.unwrap();

    assert_eq!(
        interactive.session().clip.download_href.as_deref(),
        Some("https://x/first.mp4")
    );
}

#[tokio::test]
async fn test_interactive_discards_superseded_response() {
    let service = FakeClipService::new();
    service.push_clip_after(Duration::from_millis(60), Ok(clip_result("https://x/first.mp4")));
    service.push_clip(Ok(clip_result("https://x/second.mp4")));
    let container = container(&service);

    let input = b"url https://x/video\nsubmit\nsubmit\n";
    let mut output = Vec::new();
    let mut interactive =
        InteractiveSession::new(&container, ClipperSession::new(true), OutputFormat::Text);
    interactive.run(&input[..], &mut output).await.unwrap();

    let session = interactive.session();
    assert_eq!(session.clip.download_href.as_deref(), Some("https://x/second.mp4"));
    assert!(session.clip.control.enabled);
    assert_eq!(service.clip_calls(), 2);
}

#[tokio::test]
async fn test_interactive_reports_bad_commands_and_empty_url() {
    let service = FakeClipService::new();
    let container = container(&service);

    let input = b"dance\ncheck\nsave clip.mp4\nplay\n";
    let mut output = Vec::new();
    let mut interactive =
        InteractiveSession::new(&container, ClipperSession::default(), OutputFormat::Text);
    interactive.run(&input[..], &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("commande inconnue : dance"));
    assert!(text.contains("✖ Veuillez entrer une URL d'abord."));
    assert!(text.contains("Aucune séquence à enregistrer"));
    assert!(text.contains("Rien à lire"));
    assert_eq!(service.info_calls(), 0);
}

#[tokio::test]
async fn test_interactive_show_renders_json() {
    let service = FakeClipService::new();
    let container = container(&service);

    let input = b"url https://x/video\nstart 5\nshow\n";
    let mut output = Vec::new();
    let mut interactive =
        InteractiveSession::new(&container, ClipperSession::default(), OutputFormat::Json);
    interactive.run(&input[..], &mut output).await.unwrap();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["form"]["url"], "https://x/video");
    assert_eq!(json["form"]["start_time"], "5");
    assert_eq!(json["metadata"]["status"]["state"], "idle");
    assert_eq!(json["clip"]["control"]["label"], SUBMIT_IDLE_LABEL);
}
