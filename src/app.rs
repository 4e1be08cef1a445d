use crate::config::SettingsStore;
use crate::game::{Controller, Effect, PlayerAction};
use crate::input::{collect_input_nonblocking, map_event_to_action};
use crate::render::{draw_screen, vibration_on, Palette, Terminal};
use crate::scoring::SoundCue;
use crate::storage::load_question_bank;
use crate::timer::SystemClock;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub(crate) struct Options {
    pub(crate) assets: PathBuf,
    pub(crate) settings_path: PathBuf,
    pub(crate) fps: u32,
}

pub(crate) struct App {
    controller: Controller<SystemClock>,
    store: SettingsStore,
    term: Terminal,
    fps: u32,
    should_quit: bool,
    bells: VecDeque<Instant>,
    haptic: Option<(Instant, &'static [u64])>,
}

impl App {
    fn init(opts: Options) -> anyhow::Result<Self> {
        let store = SettingsStore::new(opts.settings_path);
        let settings = store.load();
        info!(path = %store.path().display(), ?settings, "settings loaded");

        let bank = load_question_bank(&opts.assets);
        if bank.is_empty() {
            warn!(assets = %opts.assets.display(), "no question data; using default prompts");
        } else {
            info!(entries = bank.len(), "question bank ready");
        }

        let controller = Controller::new(bank, settings, SystemClock);
        let term = Terminal::begin()?;

        Ok(Self {
            controller,
            store,
            term,
            fps: opts.fps,
            should_quit: false,
            bells: VecDeque::new(),
            haptic: None,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.fps.clamp(10, 120);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);

        while !self.should_quit {
            let frame_start = Instant::now();
            self.term.resize_if_needed()?;

            // input
            let events = collect_input_nonblocking(frame_dt)?;
            for ev in events {
                match map_event_to_action(self.controller.state(), ev) {
                    Some(PlayerAction::Quit) => {
                        self.should_quit = true;
                        break;
                    }
                    Some(action) => self.controller.apply(action),
                    None => {}
                }
            }

            // timer ticks + scheduled transitions
            self.controller.update();
            for effect in self.controller.drain_effects() {
                self.handle(effect);
            }

            self.ring_due_bells()?;
            self.render_frame()?;

            // frame cap
            spin_sleep(frame_dt, frame_start);
        }

        self.term.end()?;
        Ok(())
    }

    fn handle(&mut self, effect: Effect) {
        let now = Instant::now();
        match effect {
            Effect::Sound(cue) => self.queue_sound(cue, now),
            Effect::Vibrate(pattern) => self.haptic = Some((now, pattern)),
            Effect::SettingsChanged(settings) => {
                if let Err(e) = self.store.save(&settings) {
                    warn!(error = %e, "could not save settings");
                }
            }
            Effect::ScreenShown(screen) => debug!(screen = screen.id(), "screen shown"),
            other => debug!(effect = ?other, "effect"),
        }
    }

    fn queue_sound(&mut self, cue: SoundCue, now: Instant) {
        for offset in cue.beeps_ms() {
            self.bells.push_back(now + Duration::from_millis(*offset));
        }
    }

    fn ring_due_bells(&mut self) -> anyhow::Result<()> {
        let now = Instant::now();
        while self.bells.front().is_some_and(|at| *at <= now) {
            self.bells.pop_front();
            self.term.bell()?;
        }
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let st = self.controller.state();
        let mut pal = Palette::for_theme(st.settings.theme);

        if let Some((started, pattern)) = self.haptic {
            let elapsed = started.elapsed().as_millis() as u64;
            if vibration_on(pattern, elapsed) {
                pal = pal.inverted();
            } else if elapsed > pattern.iter().sum::<u64>() {
                self.haptic = None;
            }
        }

        draw_screen(&mut self.term.cur, st, &pal);
        self.term.present(true)?;
        Ok(())
    }
}

pub(crate) fn run(opts: Options) -> anyhow::Result<()> {
    let mut app = App::init(opts)?;
    let result = app.run();
    if result.is_err() {
        // leave the terminal usable even when the loop failed
        let _ = app.term.end();
    }
    result
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
