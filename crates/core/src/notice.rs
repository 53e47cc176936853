//! User-facing notices. These are shown verbatim by the presentation layer.

/// Generic notice surfaced when a simulation run fails at the scenario stage.
///
/// Deliberately carries no detail about the underlying failure.
pub const SIMULATION_FAILURE_NOTICE: &str =
    "シミュレーションに失敗しました。タイムラインが不安定です。もう一度試してください。";

/// Notice shown while no API key has been selected.
pub const API_KEY_REQUIRED_NOTICE: &str = "ニューラルリンク(API Key)の接続待機中...";

/// Notice shown when the host offers no key selection facility.
pub const KEY_SELECTION_UNAVAILABLE_NOTICE: &str = "AI Studio環境が検出されませんでした。";
