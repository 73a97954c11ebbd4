use crate::api::*;
use crate::components::{AppView, Icon, PendingStartSignal};
use crate::db::save_backend;
use crate::player::session::PlayerSession;
use dioxus::logger::tracing::warn;
use dioxus::prelude::*;

const CATEGORIES: &[(&str, &str)] = &[
    ("meditation", "Meditation"),
    ("yoga", "Yoga"),
    ("reading", "Reading"),
    ("music", "Music"),
];

#[component]
pub fn Library() -> Element {
    let backend = use_context::<Signal<Option<BackendConfig>>>();
    let mut session = use_context::<Signal<PlayerSession>>();
    let mut pending_start = use_context::<PendingStartSignal>().0;

    let category = use_signal(|| "meditation".to_string());
    let kind = use_signal(|| TrackKind::Audio);

    let tracks = use_resource(move || {
        let config = backend();
        let category = category();
        let kind = kind();
        async move {
            let Some(config) = config else {
                return Vec::new();
            };
            let client = HyggeClient::new(config);
            match client.fetch_tracks(kind, &category, None).await {
                Ok(tracks) => tracks,
                Err(err) => {
                    warn!("track list fetch dropped: {err}");
                    Vec::new()
                }
            }
        }
    });

    if backend().is_none() {
        return rsx! {
            BackendSetup { backend }
        };
    }

    let mut start_playback = move |index: usize| {
        let Some(items) = tracks() else {
            return;
        };
        let Some(config) = backend.peek().clone() else {
            return;
        };
        let client = HyggeClient::new(config);
        let resolved = items
            .iter()
            .map(|track| Track {
                media_url: client.media_url(track),
                ..track.clone()
            })
            .collect();
        session.write().set_tracks(resolved);
        pending_start.set(Some(index));
        navigator().push(AppView::Viewer {});
    };

    let items = tracks().unwrap_or_default();

    rsx! {
        div { class: "library max-w-md mx-auto px-6 py-6 space-y-6",
            header { class: "flex items-center gap-2",
                Icon {
                    name: "leaf".to_string(),
                    class: "w-6 h-6 text-emerald-600".to_string(),
                }
                h1 { class: "text-2xl font-semibold text-stone-800", "Hygge" }
            }

            div { class: "flex gap-2 overflow-x-auto pb-1",
                for (slug , label) in CATEGORIES.iter() {
                    CategoryChip {
                        slug: slug.to_string(),
                        label: label.to_string(),
                        category,
                    }
                }
            }

            div { class: "flex gap-2",
                KindToggle { value: TrackKind::Audio, label: "Listen".to_string(), kind }
                KindToggle { value: TrackKind::Video, label: "Watch".to_string(), kind }
            }

            if items.is_empty() {
                div { class: "py-16 text-center text-stone-400",
                    p { "Nothing here yet." }
                }
            } else {
                ul { class: "divide-y divide-stone-200",
                    for (index , track) in items.iter().enumerate() {
                        li { key: "{track.id}",
                            button {
                                class: "w-full flex items-center gap-3 py-3 text-left hover:bg-stone-50",
                                onclick: move |_| start_playback(index),
                                div { class: "w-12 h-12 rounded-lg bg-emerald-900/10 flex items-center justify-center overflow-hidden shrink-0",
                                    if let Some(cover) = track.cover_url.clone() {
                                        img {
                                            class: "w-full h-full object-cover",
                                            src: "{cover}",
                                        }
                                    } else {
                                        Icon {
                                            name: "leaf".to_string(),
                                            class: "w-5 h-5 text-emerald-700".to_string(),
                                        }
                                    }
                                }
                                div { class: "flex-1 min-w-0",
                                    p { class: "font-medium text-stone-800 truncate", "{track.title}" }
                                    if let Some(artist) = track.artist.clone() {
                                        p { class: "text-sm text-stone-500 truncate", "{artist}" }
                                    }
                                }
                                div { class: "text-right text-xs text-stone-400 shrink-0",
                                    p { {format_duration(track.duration)} }
                                    p { "{track.play_count} plays" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CategoryChip(slug: String, label: String, category: Signal<String>) -> Element {
    let active = category() == slug;
    rsx! {
        button {
            class: if active { "px-4 py-1.5 rounded-full bg-emerald-600 text-white text-sm whitespace-nowrap" } else { "px-4 py-1.5 rounded-full bg-stone-200 text-stone-600 text-sm whitespace-nowrap hover:bg-stone-300" },
            onclick: {
                let mut category = category;
                let slug = slug.clone();
                move |_| category.set(slug.clone())
            },
            "{label}"
        }
    }
}

#[component]
fn KindToggle(value: TrackKind, label: String, kind: Signal<TrackKind>) -> Element {
    let active = kind() == value;
    rsx! {
        button {
            class: if active { "px-3 py-1 rounded-lg bg-stone-800 text-white text-xs uppercase tracking-wide" } else { "px-3 py-1 rounded-lg bg-stone-200 text-stone-500 text-xs uppercase tracking-wide" },
            onclick: {
                let mut kind = kind;
                move |_| kind.set(value)
            },
            "{label}"
        }
    }
}

/// First-run connection form for the hosted data service.
#[component]
fn BackendSetup(backend: Signal<Option<BackendConfig>>) -> Element {
    let mut url = use_signal(String::new);
    let mut api_key = use_signal(String::new);
    let mut user_id = use_signal(String::new);

    let mut backend = backend;
    let on_connect = move |_| {
        let url_value = url.peek().trim().to_string();
        let key_value = api_key.peek().trim().to_string();
        let user_value = user_id.peek().trim().to_string();
        if url_value.is_empty() || key_value.is_empty() || user_value.is_empty() {
            return;
        }
        let config = BackendConfig::new(url_value, key_value, user_value);
        let _ = save_backend(&config);
        backend.set(Some(config));
    };

    rsx! {
        div { class: "max-w-md mx-auto px-6 py-16 space-y-6",
            div { class: "text-center space-y-2",
                Icon {
                    name: "leaf".to_string(),
                    class: "w-10 h-10 text-emerald-600 mx-auto".to_string(),
                }
                h1 { class: "text-2xl font-semibold text-stone-800", "Welcome to Hygge" }
                p { class: "text-sm text-stone-500", "Connect to your content service to begin." }
            }
            div { class: "space-y-3",
                input {
                    class: "w-full px-4 py-2.5 rounded-xl border border-stone-300 focus:outline-none focus:border-emerald-500",
                    placeholder: "Service URL",
                    value: url,
                    oninput: move |e| url.set(e.value()),
                }
                input {
                    class: "w-full px-4 py-2.5 rounded-xl border border-stone-300 focus:outline-none focus:border-emerald-500",
                    placeholder: "API key",
                    value: api_key,
                    oninput: move |e| api_key.set(e.value()),
                }
                input {
                    class: "w-full px-4 py-2.5 rounded-xl border border-stone-300 focus:outline-none focus:border-emerald-500",
                    placeholder: "User id",
                    value: user_id,
                    oninput: move |e| user_id.set(e.value()),
                }
                button {
                    class: "w-full py-2.5 rounded-xl bg-emerald-600 text-white font-medium hover:bg-emerald-500",
                    onclick: on_connect,
                    "Connect"
                }
            }
        }
    }
}
