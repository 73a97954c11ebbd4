use crate::api::*;
use crate::components::{AppView, Icon, PendingStartSignal};
use crate::db::{save_settings, AppSettings, RepeatMode};
use crate::player::media;
use crate::player::meter::SessionMeter;
use crate::player::session::{PlayerCommand, PlayerEvent, PlayerSession, PlayerState};
use dioxus::core::spawn_forever;
use dioxus::logger::tracing::warn;
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use gloo_timers::future::TimeoutFuture;

/// Apply a transition's commands: element commands go to the bound media
/// element, report commands go out to the backend fire-and-forget.
fn dispatch(commands: Vec<PlayerCommand>, kind: TrackKind, backend: Signal<Option<BackendConfig>>) {
    for command in commands {
        match command {
            PlayerCommand::ReportPlay { track_id } => {
                report_play(backend.peek().clone(), track_id)
            }
            other => media::apply_command(kind, &other),
        }
    }
}

fn report_play(config: Option<BackendConfig>, track_id: String) {
    let Some(config) = config else {
        return;
    };
    spawn_forever(async move {
        let client = HyggeClient::new(config);
        if let Err(err) = client.increment_play_count(&track_id).await {
            warn!("play count report dropped: {err}");
        }
        if let Err(err) = client.record_play_event(&track_id).await {
            warn!("play event insert dropped: {err}");
        }
    });
}

fn report_minutes(config: Option<BackendConfig>, activity: ActivityKind, minutes: u32) {
    if minutes == 0 {
        return;
    }
    let Some(config) = config else {
        return;
    };
    spawn_forever(async move {
        let client = HyggeClient::new(config);
        if let Err(err) = client.add_activity_minutes(activity, minutes).await {
            warn!("minute report dropped: {err}");
        }
    });
}

fn current_kind(session: &Signal<PlayerSession>) -> TrackKind {
    session
        .peek()
        .current_track()
        .map(|t| t.kind)
        .unwrap_or_default()
}

/// Run after the pending render flush, so commands land on elements the
/// render just produced (the video element in particular).
fn defer<F: FnOnce() + 'static>(f: F) {
    #[cfg(target_arch = "wasm32")]
    spawn(async move {
        TimeoutFuture::new(0).await;
        f();
    });
    #[cfg(not(target_arch = "wasm32"))]
    f();
}

#[component]
pub fn Viewer() -> Element {
    let backend = use_context::<Signal<Option<BackendConfig>>>();
    let mut settings = use_context::<Signal<AppSettings>>();
    let mut session = use_context::<Signal<PlayerSession>>();
    let mut pending_start = use_context::<PendingStartSignal>().0;

    let mut meter = use_signal(SessionMeter::new);
    let mut position = use_signal(|| 0.0f64);
    let mut shown_duration = use_signal(|| 0.0f64);
    let mut playback_error = use_signal(|| None::<String>);

    // Start the track the library handed over. Binding the track re-renders
    // this view first, so the source swap is deferred until the element for
    // its kind exists.
    use_effect(move || {
        let Some(index) = *pending_start.peek() else {
            return;
        };
        pending_start.set(None);
        meter.write().reset();
        position.set(0.0);
        shown_duration.set(0.0);
        playback_error.set(None);

        let mut session = session;
        let settings = settings;
        let load = session.write().handle(PlayerEvent::Load { index });
        defer(move || {
            let kind = current_kind(&session);
            dispatch(load, kind, backend);

            let volume = settings.peek().volume;
            let set_volume = session.write().handle(PlayerEvent::SetVolume { volume });
            dispatch(set_volume, kind, backend);

            let play = session.write().handle(PlayerEvent::TogglePlayPause);
            dispatch(play, kind, backend);
        });
    });

    // Poll the element for time, duration, and the ended flag. The element
    // updates time continuously; the UI only needs coarse steps.
    #[cfg(target_arch = "wasm32")]
    use_effect(move || {
        spawn(async move {
            let mut last_emit = -1.0f64;
            let mut last_duration = 0.0f64;
            let mut last_track: Option<String> = None;
            let mut ended_for: Option<String> = None;

            loop {
                TimeoutFuture::new(250).await;

                let (kind, track_id) = {
                    let s = session.peek();
                    (
                        s.current_track().map(|t| t.kind).unwrap_or_default(),
                        s.current_track().map(|t| t.id.clone()),
                    )
                };
                if track_id.is_none() {
                    continue;
                }
                if track_id != last_track {
                    last_track = track_id.clone();
                    last_duration = 0.0;
                    last_emit = -1.0;
                }

                let time = media::current_time(kind);
                if (time - last_emit).abs() >= 0.2 {
                    last_emit = time;
                    position.set(time);
                }

                let duration = media::duration(kind);
                if duration > 0.0 && (duration - last_duration).abs() > 0.01 {
                    last_duration = duration;
                    shown_duration.set(duration);
                    let commands = session
                        .write()
                        .handle(PlayerEvent::MetadataReady { duration });
                    dispatch(commands, kind, backend);
                }

                match media::error_message(kind) {
                    Some(message) => {
                        if playback_error.peek().as_deref() != Some(message.as_str()) {
                            playback_error.set(Some(message));
                        }
                    }
                    None => {
                        if playback_error.peek().is_some() && (time > 0.0 || duration > 0.0) {
                            playback_error.set(None);
                        }
                    }
                }

                if media::has_ended(kind) {
                    if ended_for == track_id {
                        continue;
                    }
                    ended_for = track_id.clone();

                    let commands = session.write().handle(PlayerEvent::Ended);
                    let reloaded = commands
                        .iter()
                        .any(|c| matches!(c, PlayerCommand::LoadSource { .. }));
                    if reloaded {
                        meter.write().reset();
                        position.set(0.0);
                        shown_duration.set(0.0);
                        // Let the advanced track's element render before the
                        // source swap lands on it.
                        TimeoutFuture::new(0).await;
                    }
                    let kind_after = current_kind(&session);
                    dispatch(commands, kind_after, backend);
                } else {
                    ended_for = None;
                }
            }
        });
    });

    // Wall-clock second ticker: minute credits and periodic position saves.
    // Paused playback accumulates nothing.
    #[cfg(target_arch = "wasm32")]
    use_effect(move || {
        spawn(async move {
            loop {
                TimeoutFuture::new(1_000).await;

                let (kind, playing, activity) = {
                    let s = session.peek();
                    (
                        s.current_track().map(|t| t.kind).unwrap_or_default(),
                        s.is_playing(),
                        s.current_track().map(|t| t.activity()),
                    )
                };

                if playing {
                    if meter.write().tick() {
                        if let Some(activity) = activity {
                            report_minutes(backend.peek().clone(), activity, 1);
                        }
                    }
                }

                let media_time = media::current_time(kind);
                let commands = session.write().handle(PlayerEvent::Heartbeat { media_time });
                dispatch(commands, kind, backend);
            }
        });
    });

    // Closing the player flushes unreported whole minutes and releases the
    // element; the spawned loops above die with this scope.
    use_drop(move || {
        let kind = current_kind(&session);
        let activity = session.peek().current_track().map(|t| t.activity());
        let flushed = meter.write().flush();
        if let Some(activity) = activity {
            report_minutes(backend.peek().clone(), activity, flushed);
        }

        let media_time = media::current_time(kind);
        let commands = session.write().handle(PlayerEvent::Close { media_time });
        for command in &commands {
            media::apply_command(kind, command);
        }
        media::release(kind);
    });

    // Dispatch a transition and reconcile the local view state with it.
    let mut after = move |commands: Vec<PlayerCommand>| {
        let reloaded = commands
            .iter()
            .any(|c| matches!(c, PlayerCommand::LoadSource { .. }));
        let seek_target = commands.iter().find_map(|c| match c {
            PlayerCommand::SeekTo { seconds } => Some(*seconds),
            _ => None,
        });
        let kind = current_kind(&session);
        dispatch(commands, kind, backend);
        if reloaded {
            meter.write().reset();
            position.set(0.0);
            shown_duration.set(0.0);
        } else if let Some(seconds) = seek_target {
            position.set(seconds);
        }
    };

    let mut persist_modes = move || {
        let snapshot = {
            let s = session.peek();
            AppSettings {
                volume: settings.peek().volume,
                playback_speed: s.speed(),
                shuffle_enabled: s.shuffle(),
                repeat_mode: s.repeat(),
            }
        };
        settings.set(snapshot.clone());
        let _ = save_settings(&snapshot);
    };

    let (current, state, shuffle, repeat, speed, track_count) = {
        let s = session.read();
        (
            s.current_track().cloned(),
            s.state(),
            s.shuffle(),
            s.repeat(),
            s.speed(),
            s.track_count(),
        )
    };

    let Some(track) = current else {
        return rsx! {
            div { class: "flex flex-col items-center justify-center gap-4 py-24 text-stone-500",
                Icon { name: "leaf".to_string(), class: "w-10 h-10".to_string() }
                p { "Nothing is playing." }
                button {
                    class: "px-4 py-2 rounded-full bg-emerald-600 text-white",
                    onclick: move |_| {
                        navigator().push(AppView::Library {});
                    },
                    "Browse the library"
                }
            }
        };
    };

    let is_playing = state == PlayerState::Playing;
    let navigation_inert = track_count <= 1;
    let duration_secs = shown_duration();
    let progress = if duration_secs > 0.0 {
        (position() / duration_secs * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let on_toggle = move |_| {
        let commands = session.write().handle(PlayerEvent::TogglePlayPause);
        after(commands);
    };

    let on_next = move |_| {
        let commands = session.write().handle(PlayerEvent::Next);
        after(commands);
    };

    let on_previous = move |_| {
        let kind = current_kind(&session);
        let media_time = media::current_time(kind);
        let commands = session.write().handle(PlayerEvent::Previous { media_time });
        after(commands);
    };

    let on_seek = move |e: Event<FormData>| {
        if let Ok(percent) = e.value().parse::<f64>() {
            let fraction = (percent / 100.0).clamp(0.0, 1.0);
            let commands = session.write().handle(PlayerEvent::Seek { fraction });
            after(commands);
        }
    };

    let on_speed = move |_| {
        let commands = session.write().handle(PlayerEvent::CycleSpeed);
        after(commands);
        persist_modes();
    };

    let on_shuffle = move |_| {
        session.write().handle(PlayerEvent::ToggleShuffle);
        persist_modes();
    };

    let on_repeat = move |_| {
        session.write().handle(PlayerEvent::CycleRepeat);
        persist_modes();
    };

    let on_volume = move |e: Event<FormData>| {
        if let Ok(value) = e.value().parse::<f64>() {
            let volume = (value / 100.0).clamp(0.0, 1.0);
            let commands = session.write().handle(PlayerEvent::SetVolume { volume });
            after(commands);
            let mut snapshot = settings.peek().clone();
            snapshot.volume = volume;
            settings.set(snapshot.clone());
            let _ = save_settings(&snapshot);
        }
    };

    let repeat_icon = if repeat == RepeatMode::One {
        "repeat-one"
    } else {
        "repeat"
    };
    let speed_label = format!("{speed}×");
    let volume_percent = (settings().volume * 100.0).round();

    rsx! {
        div { class: "viewer flex flex-col min-h-screen max-w-md mx-auto px-6 py-4 gap-6",
            header { class: "flex items-center justify-between",
                button {
                    id: "close-player-btn",
                    class: "p-2 text-stone-500 hover:text-stone-800",
                    onclick: move |_| {
                        navigator().push(AppView::Library {});
                    },
                    Icon { name: "chevron-left".to_string(), class: "w-6 h-6".to_string() }
                }
                span { class: "text-sm uppercase tracking-widest text-stone-400", "Now playing" }
                span { class: "w-10" }
            }

            if track.kind == TrackKind::Video {
                video {
                    id: media::VIDEO_ELEMENT_ID,
                    class: "w-full rounded-2xl bg-black aspect-video",
                    playsinline: true,
                    preload: "metadata",
                }
            } else {
                div { class: "w-full aspect-square rounded-2xl bg-emerald-900/10 flex items-center justify-center overflow-hidden",
                    if let Some(cover) = track.cover_url.clone() {
                        img { class: "w-full h-full object-cover", src: "{cover}" }
                    } else {
                        Icon {
                            name: "leaf".to_string(),
                            class: "w-16 h-16 text-emerald-700".to_string(),
                        }
                    }
                }
            }

            div { class: "text-center",
                h1 { class: "text-xl font-semibold text-stone-800", "{track.title}" }
                if let Some(artist) = track.artist.clone() {
                    p { class: "text-sm text-stone-500", "{artist}" }
                }
            }

            if let Some(error) = playback_error() {
                p { class: "text-sm text-center text-red-600", "{error}" }
            }

            div { class: "flex flex-col gap-1",
                input {
                    id: "seek-bar",
                    r#type: "range",
                    min: "0",
                    max: "100",
                    step: "0.1",
                    value: "{progress}",
                    disabled: duration_secs <= 0.0,
                    class: "w-full accent-emerald-600",
                    oninput: on_seek,
                }
                div { class: "flex justify-between text-xs text-stone-400",
                    span { {format_duration(position() as u32)} }
                    span { {format_duration(duration_secs as u32)} }
                }
            }

            div { class: "flex items-center justify-between",
                button {
                    id: "shuffle-btn",
                    class: if shuffle { "p-2 text-emerald-600" } else { "p-2 text-stone-400 hover:text-stone-700" },
                    onclick: on_shuffle,
                    Icon { name: "shuffle".to_string(), class: "w-5 h-5".to_string() }
                }
                button {
                    id: "prev-btn",
                    disabled: navigation_inert,
                    class: "p-2 text-stone-700 disabled:text-stone-300",
                    onclick: on_previous,
                    Icon { name: "skip-back".to_string(), class: "w-7 h-7".to_string() }
                }
                button {
                    id: "play-pause-btn",
                    class: "p-4 rounded-full bg-emerald-600 text-white shadow-lg hover:bg-emerald-500",
                    onclick: on_toggle,
                    if is_playing {
                        Icon { name: "pause".to_string(), class: "w-7 h-7".to_string() }
                    } else {
                        Icon { name: "play".to_string(), class: "w-7 h-7".to_string() }
                    }
                }
                button {
                    id: "next-btn",
                    disabled: navigation_inert,
                    class: "p-2 text-stone-700 disabled:text-stone-300",
                    onclick: on_next,
                    Icon { name: "skip-forward".to_string(), class: "w-7 h-7".to_string() }
                }
                button {
                    id: "repeat-btn",
                    class: if repeat == RepeatMode::Off { "p-2 text-stone-400 hover:text-stone-700" } else { "p-2 text-emerald-600" },
                    onclick: on_repeat,
                    Icon { name: repeat_icon.to_string(), class: "w-5 h-5".to_string() }
                }
            }

            div { class: "flex items-center justify-between gap-4",
                button {
                    id: "speed-btn",
                    class: "px-3 py-1 rounded-full border border-stone-300 text-sm text-stone-600 hover:border-emerald-500",
                    onclick: on_speed,
                    "{speed_label}"
                }
                div { class: "flex items-center gap-2 flex-1 max-w-[12rem]",
                    Icon {
                        name: "volume".to_string(),
                        class: "w-4 h-4 text-stone-400".to_string(),
                    }
                    input {
                        id: "volume-bar",
                        r#type: "range",
                        min: "0",
                        max: "100",
                        value: "{volume_percent}",
                        class: "w-full accent-emerald-600",
                        oninput: on_volume,
                    }
                }
            }

            if let Some(description) = track.description.clone() {
                p { class: "text-sm leading-relaxed text-stone-500", "{description}" }
            }
        }
    }
}
