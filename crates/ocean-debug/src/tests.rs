//! Unit tests for the tuning API.

use crate::{TuningServer, TuningState, parse_port};
use ocean_scene::{SceneParams, param_channel};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn start_server(state: Arc<Mutex<TuningState>>) -> (TuningServer, ocean_scene::ParamQueue) {
    let (sender, queue) = param_channel();
    let mut server = TuningServer::new(0); // port 0 = OS assigns
    server.start(state, sender).unwrap();

    // Give server a moment to start
    thread::sleep(Duration::from_millis(100));
    (server, queue)
}

fn url(server: &TuningServer, path: &str) -> String {
    format!("http://localhost:{}{}", server.actual_port(), path)
}

#[test]
fn test_tuning_state_default() {
    let state = TuningState::default();
    assert_eq!(state.frame_count, 0);
    assert!(!state.quit_requested);
    assert_eq!(state.params, SceneParams::default());
}

#[test]
fn test_parse_port() {
    assert_eq!(parse_port(Some("8080")), Some(8080));
    assert_eq!(parse_port(Some(" 7000 ")), Some(7000));
    assert_eq!(parse_port(Some("not-a-port")), None);
    assert_eq!(parse_port(Some("70000")), None);
    assert_eq!(parse_port(None), None);
}

#[test]
fn test_health_endpoint() {
    let state = Arc::new(Mutex::new(TuningState {
        uptime_seconds: 4.5,
        ..Default::default()
    }));
    let (mut server, _queue) = start_server(state);

    let resp = ureq::get(&url(&server, "/health")).call().unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["status"], "ok");
    assert!((body["uptime_seconds"].as_f64().unwrap() - 4.5).abs() < 1e-9);
    server.stop();
}

#[test]
fn test_metrics_endpoint_omits_params() {
    let state = Arc::new(Mutex::new(TuningState {
        frame_count: 100,
        frame_time_ms: 16.6,
        fps: 60.2,
        window_width: 1024,
        window_height: 1024,
        ..Default::default()
    }));
    let (mut server, _queue) = start_server(state);

    let resp = ureq::get(&url(&server, "/metrics")).call().unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.header("Content-Type"), Some("application/json"));
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["frame_count"], 100);
    assert!((body["fps"].as_f64().unwrap() - 60.2).abs() < 0.01);
    assert_eq!(body["window_width"], 1024);
    assert!(body.get("params").is_none());
    server.stop();
}

#[test]
fn test_params_snapshot() {
    let mut params = SceneParams::default();
    params.apply_preset(1).unwrap();
    let state = Arc::new(Mutex::new(TuningState {
        params,
        ..Default::default()
    }));
    let (mut server, _queue) = start_server(state);

    let body: serde_json::Value = ureq::get(&url(&server, "/params"))
        .call()
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(body["terrain_preset"], 1);
    assert!(body["ocean"]["waves"]["waves"].as_array().is_some());
    server.stop();
}

#[test]
fn test_presets_listing() {
    let state = Arc::new(Mutex::new(TuningState::default()));
    let (mut server, _queue) = start_server(state);

    let body: serde_json::Value = ureq::get(&url(&server, "/presets"))
        .call()
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(body["terrain"].as_array().unwrap().len(), 4);
    assert_eq!(body["skybox"].as_array().unwrap().len(), 4);
    assert_eq!(body["terrain"][0], "archipelago");
    server.stop();
}

#[test]
fn test_post_single_update_is_queued_not_applied() {
    let state = Arc::new(Mutex::new(TuningState::default()));
    let (mut server, queue) = start_server(state.clone());

    let resp = ureq::post(&url(&server, "/params"))
        .set("Content-Type", "application/json")
        .send_string(r#"{"param": "murkiness", "value": 2.0}"#)
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["queued"], 1);

    // the server only forwards; the snapshot is untouched until the frame loop drains
    assert_eq!(state.lock().unwrap().params, SceneParams::default());

    let mut params = SceneParams::default();
    assert_eq!(queue.drain_into(&mut params), 1);
    assert_eq!(params.ocean.optics.murkiness, 2.0);
    server.stop();
}

#[test]
fn test_post_batch_preserves_order() {
    let state = Arc::new(Mutex::new(TuningState::default()));
    let (mut server, queue) = start_server(state);

    let resp = ureq::post(&url(&server, "/params"))
        .send_string(
            r#"[
                {"param": "apply_preset", "value": 2},
                {"param": "height_scale", "value": 0.5},
                {"param": "apply_skybox", "value": 3}
            ]"#,
        )
        .unwrap();
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["queued"], 3);

    let mut params = SceneParams::default();
    assert_eq!(queue.drain_into(&mut params), 3);
    assert_eq!(params.terrain_preset, 2);
    assert_eq!(params.terrain.shape.height_scale, 0.5);
    assert_eq!(params.skybox_preset, 3);
    server.stop();
}

#[test]
fn test_post_invalid_update_returns_400() {
    let state = Arc::new(Mutex::new(TuningState::default()));
    let (mut server, queue) = start_server(state);

    let resp = ureq::post(&url(&server, "/params"))
        .send_string(r#"{"param": "no_such_param", "value": 1}"#);
    match resp {
        Err(ureq::Error::Status(code, _)) => assert_eq!(code, 400),
        other => panic!("expected 400, got {other:?}"),
    }

    let mut params = SceneParams::default();
    assert_eq!(queue.drain_into(&mut params), 0);
    server.stop();
}

#[test]
fn test_post_after_render_loop_gone_returns_503() {
    let state = Arc::new(Mutex::new(TuningState::default()));
    let (mut server, queue) = start_server(state);
    drop(queue);

    let resp = ureq::post(&url(&server, "/params"))
        .send_string(r#"{"param": "wave_scale", "value": 1.2}"#);
    match resp {
        Err(ureq::Error::Status(code, _)) => assert_eq!(code, 503),
        other => panic!("expected 503, got {other:?}"),
    }
    server.stop();
}

#[test]
fn test_command_quit() {
    let state = Arc::new(Mutex::new(TuningState::default()));
    let (mut server, _queue) = start_server(state.clone());

    let resp = ureq::post(&url(&server, "/command"))
        .set("Content-Type", "application/json")
        .send_string(r#"{"command": "quit"}"#)
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["executed"], true);
    assert_eq!(body["command"], "quit");

    assert!(state.lock().unwrap().quit_requested);
    server.stop();
}

#[test]
fn test_unknown_command_not_executed() {
    let state = Arc::new(Mutex::new(TuningState::default()));
    let (mut server, _queue) = start_server(state.clone());

    let body: serde_json::Value = ureq::post(&url(&server, "/command"))
        .send_string(r#"{"command": "dance"}"#)
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(body["executed"], false);
    assert!(!state.lock().unwrap().quit_requested);
    server.stop();
}

#[test]
fn test_unknown_endpoint_returns_404() {
    let state = Arc::new(Mutex::new(TuningState::default()));
    let (mut server, _queue) = start_server(state);

    let resp = ureq::get(&url(&server, "/nonexistent")).call();
    if let Err(ureq::Error::Status(code, _)) = resp {
        assert_eq!(code, 404);
    } else {
        panic!("Expected 404 status error");
    }
    server.stop();
}

#[test]
fn test_stop_joins_thread() {
    let state = Arc::new(Mutex::new(TuningState::default()));
    let (mut server, _queue) = start_server(state);
    assert!(server.is_running());
    server.stop();
    assert!(!server.is_running());
}
