use crate::components::{Library, Viewer};
use crate::db::{default_position_store, load_backend, load_settings};
use crate::player::session::PlayerSession;
use dioxus::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, PartialEq, Routable)]
pub enum AppView {
    #[layout(AppShell)]
    #[route("/")]
    Library {},
    #[route("/player")]
    Viewer {},
}

/// Index into the active track list that the player starts on mount.
#[derive(Clone, Copy)]
pub struct PendingStartSignal(pub Signal<Option<usize>>);

#[component]
pub fn AppShell() -> Element {
    let settings = use_signal(load_settings);
    let backend = use_signal(load_backend);
    let session = use_signal(move || {
        let saved = settings.peek().clone();
        let mut session = PlayerSession::new(default_position_store(), StdRng::from_entropy());
        session.set_shuffle(saved.shuffle_enabled);
        session.set_repeat(saved.repeat_mode);
        session.set_speed(saved.playback_speed);
        session
    });
    let pending_start = use_signal(|| None::<usize>);

    // Shared state for the views below
    use_context_provider(|| settings);
    use_context_provider(|| backend);
    use_context_provider(|| session);
    use_context_provider(|| PendingStartSignal(pending_start));

    rsx! {
        div { class: "app-shell min-h-screen bg-stone-100 text-stone-800",
            Outlet::<AppView> {}
        }
    }
}
