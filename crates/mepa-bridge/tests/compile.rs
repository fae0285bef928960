use mepa_bridge::bridge::{BACKEND_FAILED, OPTIMIZATION_SKIPPED};
use mepa_bridge::config::DEFAULT_PLACEHOLDER;
use mepa_bridge::{BridgeConfig, BridgeError, CompileDebouncer, CompileReport, CompilerBridge, StageOutput};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Backend that echoes the source back as the translation.
fn echo_backend(
    calls: Arc<AtomicUsize>,
) -> impl Fn(&str) -> Result<String, anyhow::Error> + Send + Sync + 'static {
    move |source: &str| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::json!({
            "mepa": { "Ok": source },
            "optimized": { "Ok": format!("{}\n; optimized", source) },
        })
        .to_string())
    }
}

#[test]
fn test_compile_returns_both_stages() {
    let calls = Arc::new(AtomicUsize::new(0));
    let bridge = CompilerBridge::new(echo_backend(calls.clone()));

    let report = bridge.compile("fn main() { print(1); }");
    assert_eq!(
        report.translation.instructions(),
        Some("fn main() { print(1); }")
    );
    assert!(report.optimized.display_text().ends_with("; optimized"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_blank_source_is_not_compiled() {
    let calls = Arc::new(AtomicUsize::new(0));
    let bridge = CompilerBridge::new(echo_backend(calls.clone()));

    assert!(bridge.compile("  \n\t").is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_compile_error_is_surfaced_verbatim() {
    let bridge = CompilerBridge::new(|_: &str| -> Result<String, anyhow::Error> {
        Ok(r#"{"mepa": {"Err": "line 1: expected ';'"}, "optimized": {"Err": "line 1: expected ';'"}}"#.to_string())
    });

    let report = bridge.compile("fn main() { x = 1 }");
    assert_eq!(report.translation, StageOutput::Failed("line 1: expected ';'".into()));
    assert_eq!(report.translation.instructions(), None);
}

#[test]
fn test_malformed_payload_degrades_to_placeholder() {
    let bridge = CompilerBridge::new(|_: &str| -> Result<String, anyhow::Error> {
        Ok("<html>oops</html>".to_string())
    });

    let report = bridge.compile("fn main() {}");
    assert_eq!(report, CompileReport::placeholder(DEFAULT_PLACEHOLDER));
    assert_eq!(report.translation.display_text(), DEFAULT_PLACEHOLDER);
    assert_eq!(report.optimized.display_text(), DEFAULT_PLACEHOLDER);
}

#[test]
fn test_configured_placeholder_is_used() {
    let config = BridgeConfig {
        placeholder: "compiler output unreadable".to_string(),
        ..BridgeConfig::default()
    };
    let bridge = CompilerBridge::with_config(
        |_: &str| -> Result<String, anyhow::Error> { Ok("null".to_string()) },
        config,
    );

    let report = bridge.compile("fn main() {}");
    assert_eq!(report.optimized.display_text(), "compiler output unreadable");
}

#[test]
fn test_backend_failure_reports_both_stages() {
    let bridge = CompilerBridge::new(|_: &str| -> Result<String, anyhow::Error> {
        Err(anyhow::anyhow!("compiler panicked"))
    });

    let report = bridge.compile("fn main() {}");
    assert_eq!(report.translation, StageOutput::Failed(BACKEND_FAILED.into()));
    assert_eq!(report.optimized, StageOutput::Failed(OPTIMIZATION_SKIPPED.into()));
}

#[tokio::test(start_paused = true)]
async fn test_debouncer_compiles_only_the_last_edit() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut debouncer = CompileDebouncer::new(CompilerBridge::new(echo_backend(calls.clone())));
    let mut reports = debouncer.subscribe();

    debouncer.submit("fn main() { read(x); }").unwrap();
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_millis(500)).await;
    debouncer.submit("fn main() { read(x); print(x); }").unwrap();
    assert!(debouncer.is_pending());

    reports.changed().await.unwrap();
    assert_eq!(
        reports.borrow().translation.instructions(),
        Some("fn main() { read(x); print(x); }")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_debouncer_waits_for_quiet_period() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut debouncer = CompileDebouncer::new(CompilerBridge::new(echo_backend(calls.clone())));
    let mut reports = debouncer.subscribe();
    let start = tokio::time::Instant::now();

    debouncer.submit("fn main() {}").unwrap();
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_millis(999)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    reports.changed().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(1000));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(debouncer.latest().translation.instructions(), Some("fn main() {}"));
}

#[tokio::test(start_paused = true)]
async fn test_blank_edit_clears_and_cancels() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut debouncer = CompileDebouncer::new(CompilerBridge::new(echo_backend(calls.clone())));

    debouncer.submit("fn main() {}").unwrap();
    debouncer.submit("   ").unwrap();
    assert!(!debouncer.is_pending());
    assert!(debouncer.latest().is_empty());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_debouncer_outside_runtime() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut debouncer = CompileDebouncer::new(CompilerBridge::new(echo_backend(calls.clone())));

    let result = debouncer.submit("fn main() {}");
    assert!(matches!(result, Err(BridgeError::NoRuntime)));
    assert!(!debouncer.is_pending());

    // Clearing needs no runtime.
    assert!(debouncer.submit("").is_ok());
    assert!(debouncer.latest().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
