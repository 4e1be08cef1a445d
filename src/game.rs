use crate::catalog::{explanation_for, questions_for, QuestionBank};
use crate::config::{Settings, SETTINGS_ITEMS};
use crate::model::{
    AnswerFeedback, Difficulty, GameState, QuestionView, ResultView, Screen, Side,
};
use crate::scoring::{
    correct_side, evaluate, summarize, Evaluation, FeedbackCue, SoundCue, CORRECT_CUE,
    INCORRECT_CUE,
};
use crate::timer::{Clock, Tick};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

pub(crate) const LOADING_DELAY: Duration = Duration::from_millis(500);
pub(crate) const EXPLANATION_DURATION: Duration = Duration::from_millis(1500);
pub(crate) const ADVANCE_DELAY: Duration = Duration::from_millis(2500);

/// Everything the core asks the front end to show or play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Effect {
    ScreenShown(Screen),
    LoadingShown,
    QuestionShown(QuestionView),
    AnswerFeedback(AnswerFeedback),
    Explanation(&'static str),
    ExplanationHidden,
    ResultShown(ResultView),
    Sound(SoundCue),
    Vibrate(&'static [u64]),
    SettingsChanged(Settings),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PlayerAction {
    Navigate(&'static str),
    ChooseDifficulty(Difficulty),
    SelectImage(bool),
    PlayAgain,
    SettingsMove(i32),
    SettingsToggle,
    Back,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    ShowFirstQuestion,
    HideExplanation,
    Advance,
}

/// Owns the game state and drives every screen transition.
pub(crate) struct Controller<C: Clock> {
    state: GameState,
    bank: QuestionBank,
    clock: C,
    schedule: Vec<(Instant, Pending)>,
    outbox: Vec<Effect>,
}

impl<C: Clock> Controller<C> {
    pub(crate) fn new(bank: QuestionBank, settings: Settings, clock: C) -> Self {
        Self {
            state: GameState::new(settings),
            bank,
            clock,
            schedule: Vec::new(),
            outbox: Vec::new(),
        }
    }

    pub(crate) fn state(&self) -> &GameState {
        &self.state
    }

    pub(crate) fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn apply(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::Navigate(id) => {
                self.go_to_id(id);
            }
            PlayerAction::ChooseDifficulty(d) => self.start_game(Some(d)),
            PlayerAction::SelectImage(chose_true) => {
                self.select_image(chose_true);
            }
            PlayerAction::PlayAgain => self.play_again(),
            PlayerAction::SettingsMove(delta) => {
                let len = SETTINGS_ITEMS as i32;
                let next = (self.state.settings_cursor as i32 + delta).rem_euclid(len);
                self.state.settings_cursor = next as usize;
            }
            PlayerAction::SettingsToggle => self.toggle_setting(),
            PlayerAction::Back => {
                if self.state.screen == Screen::Game || self.state.loading {
                    self.abandon_game();
                } else if self.state.screen != Screen::Menu {
                    self.go_to(Screen::Menu);
                }
            }
            PlayerAction::Quit => {}
        }
    }

    pub(crate) fn go_to(&mut self, screen: Screen) {
        self.state.screen = screen;
        self.emit(Effect::ScreenShown(screen));
        match screen {
            Screen::Settings => self.state.settings_cursor = 0,
            Screen::Result => self.display_results(),
            _ => {}
        }
    }

    /// Navigates by screen id. Unknown ids are ignored.
    pub(crate) fn go_to_id(&mut self, id: &str) -> bool {
        match Screen::from_id(id) {
            Some(screen) => {
                self.go_to(screen);
                true
            }
            None => {
                debug!(id, "ignoring navigation to unknown screen");
                false
            }
        }
    }

    pub(crate) fn start_game(&mut self, difficulty: Option<Difficulty>) {
        if let Some(d) = difficulty {
            self.state.set_difficulty(d);
        }
        self.schedule.clear();
        self.state.reset();
        self.state.questions = questions_for(self.state.difficulty).to_vec();
        info!(
            difficulty = ?self.state.difficulty,
            questions = self.state.questions.len(),
            "starting game"
        );

        self.state.loading = true;
        self.emit(Effect::LoadingShown);
        self.schedule_in(LOADING_DELAY, Pending::ShowFirstQuestion);
    }

    pub(crate) fn play_again(&mut self) {
        self.start_game(Some(self.state.difficulty));
    }

    pub(crate) fn load_question(&mut self) {
        let Some(question) = self.state.current_question().copied() else {
            debug!(index = self.state.question_index, "no question to load");
            return;
        };

        self.state.answered = false;
        self.state.feedback = None;
        self.state.explanation = None;

        let number = self.state.question_index + 1;
        let total = self.state.total_questions;
        let view = QuestionView {
            number,
            total,
            category: question.category,
            true_image: question.true_image,
            false_image: question.false_image,
            prompt: self.bank.prompt_for(&question).to_string(),
            progress_percent: (number * 100 / total.max(1)) as u8,
            score: self.state.score,
        };
        debug!(number, category = question.category.code(), "question shown");
        self.state.current = Some(view.clone());
        self.emit(Effect::QuestionShown(view));

        let now = self.clock.now();
        self.state.timer.start(now);
    }

    /// Accepts the first pick for the current question. Later picks, and
    /// picks outside the game screen, are ignored and return `None`.
    pub(crate) fn select_image(&mut self, chose_true: bool) -> Option<Evaluation> {
        self.answer(Some(chose_true))
    }

    pub(crate) fn advance(&mut self) {
        self.state.question_index += 1;
        if self.state.question_index < self.state.total_questions {
            self.load_question();
        } else {
            self.state.timer.cancel();
            self.go_to(Screen::Result);
        }
    }

    /// Delivers due timer ticks and scheduled transitions.
    pub(crate) fn update(&mut self) {
        let now = self.clock.now();

        while let Some(tick) = self.state.timer.poll(now) {
            match tick {
                Tick::Counted(left) => trace!(left, "tick"),
                Tick::Expired if !self.state.answered => {
                    debug!("countdown expired; forcing answer");
                    self.answer(None);
                }
                Tick::Expired => {}
            }
        }

        while let Some(i) = self.next_due(now) {
            let (_, pending) = self.schedule.remove(i);
            self.run(pending);
        }
    }

    /// `None` is the forced answer when time runs out. It is scored as a pick
    /// of the second image but shown with no selection.
    fn answer(&mut self, pick: Option<bool>) -> Option<Evaluation> {
        if self.state.screen != Screen::Game || self.state.loading {
            return None;
        }
        if self.state.answered {
            debug!("question already answered; ignoring pick");
            return None;
        }
        let question = self.state.current_question().copied()?;

        self.state.answered = true;
        self.state.timer.cancel();

        let metadata = self.bank.lookup(&question);
        let chose_true = pick.unwrap_or(false);
        let eval = evaluate(&question, metadata, chose_true, self.state.timer_remaining());
        if eval.is_correct {
            self.state.score += eval.points;
            self.state.correct_count += 1;
        }
        info!(
            question = question.ordinal,
            correct = eval.is_correct,
            points = eval.points,
            timed_out = pick.is_none(),
            "answer scored"
        );

        let feedback = AnswerFeedback {
            selected: pick.map(Side::from_choice),
            selected_correct: eval.is_correct,
            correct_side: correct_side(&question, metadata),
            points: eval.points,
        };
        self.state.feedback = Some(feedback);
        if let Some(view) = self.state.current.as_mut() {
            view.score = self.state.score;
        }
        self.emit(Effect::AnswerFeedback(feedback));
        self.play_cue(if eval.is_correct {
            CORRECT_CUE
        } else {
            INCORRECT_CUE
        });

        let text = explanation_for(question.category);
        self.state.explanation = Some(text);
        self.emit(Effect::Explanation(text));
        self.schedule_in(EXPLANATION_DURATION, Pending::HideExplanation);
        self.schedule_in(ADVANCE_DELAY, Pending::Advance);

        Some(eval)
    }

    fn display_results(&mut self) {
        let summary = summarize(self.state.correct_count, self.state.total_questions);
        info!(
            score = self.state.score,
            correct = self.state.correct_count,
            total = self.state.total_questions,
            tier = ?summary.tier,
            "game finished"
        );
        let cue = summary.cue;
        let view = ResultView {
            score: self.state.score,
            correct_count: self.state.correct_count,
            total: self.state.total_questions,
            summary,
        };
        self.state.result = Some(view.clone());
        self.emit(Effect::ResultShown(view));
        self.play_cue(cue);
    }

    fn abandon_game(&mut self) {
        debug!(timer = ?self.state.timer.phase(), "leaving game");
        self.state.timer.cancel();
        self.schedule.clear();
        self.state.loading = false;
        self.state.explanation = None;
        self.go_to(Screen::Menu);
    }

    fn toggle_setting(&mut self) {
        if self.state.screen != Screen::Settings {
            return;
        }
        self.state.settings.toggle(self.state.settings_cursor);
        debug!(settings = ?self.state.settings, "settings changed");
        self.emit(Effect::SettingsChanged(self.state.settings.clone()));
    }

    fn play_cue(&mut self, cue: FeedbackCue) {
        if self.state.settings.sound {
            self.emit(Effect::Sound(cue.sound));
        }
        if self.state.settings.vibration {
            self.emit(Effect::Vibrate(cue.vibration));
        }
    }

    fn run(&mut self, pending: Pending) {
        match pending {
            Pending::ShowFirstQuestion => {
                self.state.loading = false;
                self.go_to(Screen::Game);
                self.load_question();
            }
            Pending::HideExplanation => {
                self.state.explanation = None;
                self.emit(Effect::ExplanationHidden);
            }
            Pending::Advance => self.advance(),
        }
    }

    fn next_due(&self, now: Instant) -> Option<usize> {
        self.schedule
            .iter()
            .enumerate()
            .filter(|(_, (at, _))| *at <= now)
            .min_by_key(|(_, (at, _))| *at)
            .map(|(i, _)| i)
    }

    fn schedule_in(&mut self, delay: Duration, pending: Pending) {
        let at = self.clock.now() + delay;
        self.schedule.push((at, pending));
    }

    fn emit(&mut self, effect: Effect) {
        self.outbox.push(effect);
    }
}
