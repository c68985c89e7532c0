//! WebSocket-based live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Path of the live-reload WebSocket endpoint.
pub const RELOAD_PATH: &str = "/__lectern_reload";

/// Messages sent to browsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// Connection established
    Connected,

    /// The site was rebuilt
    Reload,

    /// The rebuild failed; the page stays as it is
    Error {
        /// Build error message
        message: String,
    },
}

/// Hub for broadcasting reload messages to all connected browsers.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Send a message to all connected browsers.
    pub fn send(&self, msg: ReloadMessage) {
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    /// Number of connected browsers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Client script injected into every page during development.
pub fn reload_client_script() -> String {
    format!(
        r#"(function() {{
  'use strict';

  var attempts = 0;

  function connect() {{
    var proto = location.protocol === 'https:' ? 'wss:' : 'ws:';
    var ws = new WebSocket(proto + '//' + location.host + '{path}');

    ws.onopen = function() {{
      if (attempts > 0) location.reload();
      attempts = 0;
    }};

    ws.onmessage = function(event) {{
      var msg = JSON.parse(event.data);
      if (msg.type === 'reload') location.reload();
      if (msg.type === 'error') console.error('[lectern] ' + msg.message);
    }};

    ws.onclose = function() {{
      if (attempts++ < 10) setTimeout(connect, 500 * attempts);
    }};
  }}

  connect();
}})();"#,
        path = RELOAD_PATH
    )
}
