use std::collections::BTreeSet;

use crate::ui::controls::{PAIR_SERVER_CLASS, QR_SERVER_CLASS, element};

/// A server selection button: its class and `data-server` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerButton {
    pub class: &'static str,
    pub server: Option<String>,
    pub label: String,
}

/// The structure of a page the controller binds to.
#[derive(Debug, Clone, Default)]
pub struct PageMarkup {
    ids: BTreeSet<String>,
    server_buttons: Vec<ServerButton>,
}

impl PageMarkup {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock GODZEXMD page with `pair_servers` and `qr_servers` buttons.
    pub fn godzexmd(pair_servers: u32, qr_servers: u32) -> Self {
        let mut markup = element::REQUIRED
            .into_iter()
            .fold(Self::new(), |markup, id| markup.with_id(id));

        for server in 1..=pair_servers {
            markup = markup.with_server_button(
                PAIR_SERVER_CLASS,
                Some(server.to_string()),
                format!("Pair Code Server {server}"),
            );
        }
        for server in 1..=qr_servers {
            markup = markup.with_server_button(
                QR_SERVER_CLASS,
                Some(server.to_string()),
                format!("QR Code Server {server}"),
            );
        }

        markup
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.ids.insert(id.to_string());
        self
    }

    pub fn without_id(mut self, id: &str) -> Self {
        self.ids.remove(id);
        self
    }

    pub fn with_server_button(
        mut self,
        class: &'static str,
        server: Option<String>,
        label: impl Into<String>,
    ) -> Self {
        self.server_buttons.push(ServerButton {
            class,
            server,
            label: label.into(),
        });
        self
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn server_buttons(&self, class: &str) -> impl Iterator<Item = &ServerButton> {
        self.server_buttons
            .iter()
            .filter(move |button| button.class == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_page_has_every_required_id() {
        let markup = PageMarkup::godzexmd(2, 3);
        assert!(element::REQUIRED.iter().all(|id| markup.has_id(id)));
        assert_eq!(markup.server_buttons(PAIR_SERVER_CLASS).count(), 2);
        assert_eq!(markup.server_buttons(QR_SERVER_CLASS).count(), 3);
    }
}
