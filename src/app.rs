use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{Config, MAX_WORD_COUNT, MIN_WORD_COUNT, Overrides};
use crate::engine::key_stats::KeyStatRecord;
use crate::engine::speed::{SpeedFormula, WordsPerMinute};
use crate::generator::TextGenerator;
use crate::generator::dictionary::Dictionary;
use crate::generator::words::WordGenerator;
use crate::keyboard::press_bus::KeyPressBus;
use crate::keyboard::tile::KeyboardState;
use crate::session::input;
use crate::session::practice::PracticeState;
use crate::store::json_store::JsonStore;
use crate::ui::components::settings::SettingsField;
use crate::ui::theme::Theme;

const WORD_COUNT_STEP: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Practice,
    Settings,
}

/// Owns everything the UI reads: config, the key stats record, the keyboard
/// tiles and the running practice.
pub struct App {
    pub screen: AppScreen,
    /// Settings in effect, command line overrides included.
    pub config: Config,
    pub theme: Theme,
    pub key_stats: KeyStatRecord,
    pub keyboard: KeyboardState,
    pub practice: PracticeState,
    pub last_wpm: Option<f64>,
    pub completed_runs: u32,
    /// Samples the current run has added to `key_stats`.
    pub run_samples: u32,
    pub settings_selected: usize,
    pub should_quit: bool,
    /// What the config file holds. Only changes made in settings reach it.
    saved_config: Config,
    bus: KeyPressBus,
    formula: Box<dyn SpeedFormula>,
    generator: Box<dyn TextGenerator>,
    store: Option<JsonStore>,
    config_path: Option<PathBuf>,
    available_themes: Vec<String>,
}

impl App {
    /// Build the app for the user's real config and data dirs.
    pub fn new(
        config: Config,
        overrides: &Overrides,
        theme: Theme,
        store: Option<JsonStore>,
    ) -> Self {
        Self::with_parts(
            config,
            overrides,
            theme,
            store,
            Some(Config::config_path()),
            Box::new(WordGenerator::new(Dictionary::load())),
        )
    }

    pub fn with_parts(
        saved_config: Config,
        overrides: &Overrides,
        theme: Theme,
        store: Option<JsonStore>,
        config_path: Option<PathBuf>,
        mut generator: Box<dyn TextGenerator>,
    ) -> Self {
        let key_stats = match &store {
            Some(store) => store.load_key_stats(),
            None => KeyStatRecord::for_all_schemes(),
        };
        let config = saved_config.with_overrides(overrides);
        let bus = KeyPressBus::new();
        let keyboard = KeyboardState::new(&config.keyboard_scheme, &bus);
        let practice = PracticeState::new(&generator.generate(config.word_count));

        Self {
            screen: AppScreen::Practice,
            config,
            theme,
            key_stats,
            keyboard,
            practice,
            last_wpm: None,
            completed_runs: 0,
            run_samples: 0,
            settings_selected: 0,
            should_quit: false,
            saved_config,
            bus,
            formula: Box::new(WordsPerMinute),
            generator,
            store,
            config_path,
            available_themes: Theme::available_themes(),
        }
    }

    pub fn formula(&self) -> &dyn SpeedFormula {
        self.formula.as_ref()
    }

    pub fn set_formula(&mut self, formula: Box<dyn SpeedFormula>) {
        self.formula = formula;
    }

    /// Feed a physical key press to the keyboard tiles.
    pub fn press_key(&self, key_name: &str, now: Instant) -> usize {
        self.bus.dispatch(key_name, now)
    }

    /// Release expired key flashes.
    pub fn tick(&self, now: Instant) -> usize {
        self.keyboard.tick(now)
    }

    pub fn type_char(&mut self, ch: char, now: Instant) {
        let Some(event) = input::process_char(&mut self.practice, ch, now, &mut self.key_stats)
        else {
            return;
        };
        if !event.correct {
            debug!(expected = %event.expected, actual = %event.actual, "missed key");
        } else if event.interval_ms.is_some() {
            self.run_samples += 1;
        }
        if self.practice.is_complete() {
            self.finish_run(now);
        }
    }

    pub fn backspace(&mut self) {
        input::process_backspace(&mut self.practice);
    }

    fn finish_run(&mut self, now: Instant) {
        let wpm = self.practice.wpm_at(now);
        self.completed_runs += 1;
        self.last_wpm = Some(wpm);
        info!(
            wpm = format_args!("{wpm:.1}"),
            accuracy = format_args!("{:.1}", self.practice.accuracy()),
            errors = self.practice.incorrect_count(),
            samples = self.run_samples,
            run = self.completed_runs,
            "run complete"
        );
        self.save_stats();
        self.new_run();
    }

    /// Start over with fresh words. Stats gathered so far are kept.
    pub fn new_run(&mut self) {
        self.practice = PracticeState::new(&self.generator.generate(self.config.word_count));
        self.run_samples = 0;
    }

    pub fn save_stats(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save_key_stats(&self.key_stats) {
                warn!(error = %e, "failed to save key stats");
            }
        }
    }

    pub fn reset_stats(&mut self) {
        self.key_stats = KeyStatRecord::for_all_schemes();
        if let Some(store) = &self.store {
            if let Err(e) = store.reset_key_stats() {
                warn!(error = %e, "failed to reset key stats");
            }
        }
    }

    pub fn quit(&mut self) {
        self.save_stats();
        self.should_quit = true;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    /// Leave settings, persisting what was changed there. A changed word
    /// count takes effect with a fresh run.
    pub fn leave_settings(&mut self) {
        self.saved_config.validate();
        if let Some(path) = &self.config_path {
            if let Err(e) = self.saved_config.save_to(path) {
                warn!(error = %e, "failed to save config");
            }
        }
        if self.practice.cursor == 0 {
            self.new_run();
        }
        self.screen = AppScreen::Practice;
    }

    pub fn settings_next(&mut self) {
        self.settings_selected = (self.settings_selected + 1) % SettingsField::ALL.len();
    }

    pub fn settings_prev(&mut self) {
        let len = SettingsField::ALL.len();
        self.settings_selected = (self.settings_selected + len - 1) % len;
    }

    pub fn settings_cycle(&mut self, forward: bool) {
        match SettingsField::ALL[self.settings_selected] {
            SettingsField::KeyboardScheme => {
                self.config.cycle_scheme(forward);
                self.keyboard.set_scheme(&self.config.keyboard_scheme);
                self.saved_config.keyboard_scheme = self.config.keyboard_scheme.clone();
            }
            SettingsField::Theme => {
                self.config.cycle_theme(&self.available_themes, forward);
                self.theme = Theme::resolve(&self.config.theme);
                self.saved_config.theme = self.config.theme.clone();
            }
            SettingsField::WordCount => {
                let count = if forward {
                    self.config.word_count + WORD_COUNT_STEP
                } else {
                    self.config.word_count.saturating_sub(WORD_COUNT_STEP)
                };
                self.config.word_count = count.clamp(MIN_WORD_COUNT, MAX_WORD_COUNT);
                self.saved_config.word_count = self.config.word_count;
            }
        }
        debug!(
            field = ?SettingsField::ALL[self.settings_selected],
            "setting changed"
        );
    }
}
