use std::{collections::HashMap, path::PathBuf};

use anyhow::{Context as _, bail};
use pairs_engine::{
    BestScoreStore, Card, Color, Deck, DeckSeed, GameSession, MemoryBestScoreStore, Renderer,
    ReplayPrompt, RoundOutcome, ScoreSnapshot, SelectionState, TimerQueue,
};
use serde::Serialize;

use crate::{command::session_config::SessionConfigArg, store::FileBestScoreStore, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    session: SessionConfigArg,
    /// Number of rounds to play
    #[clap(long, default_value_t = 10)]
    rounds: usize,
    /// File that keeps the best score between runs (in memory when absent)
    #[clap(long)]
    best_score_file: Option<PathBuf>,
    /// Output file path for the report (JSON format, stdout when absent)
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationReport {
    seed: DeckSeed,
    colors: usize,
    rounds: Vec<RoundReport>,
    best_score: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
struct RoundReport {
    round: usize,
    score: ScoreSnapshot,
    mismatches: usize,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        session,
        rounds,
        best_score_file,
        output,
    } = arg;

    let config = session.load()?;
    let mut store: Box<dyn BestScoreStore> = match best_score_file {
        Some(path) => Box::new(FileBestScoreStore::open(path)),
        None => Box::new(MemoryBestScoreStore::default()),
    };
    let mut session = GameSession::start_with_store(&config, &*store)?;
    log::info!("simulating {rounds} rounds with seed {}", session.seed());

    let report = simulate(&mut session, &mut *store, *rounds)?;
    eprintln!(
        "Played {} rounds, best score {}",
        report.rounds.len(),
        report
            .best_score
            .map_or_else(|| "-".to_owned(), |best| best.to_string())
    );
    Output::save_json(&report, output.clone())?;
    Ok(())
}

fn simulate(
    session: &mut GameSession,
    store: &mut dyn BestScoreStore,
    rounds: usize,
) -> anyhow::Result<SimulationReport> {
    let mut report = SimulationReport {
        seed: session.seed(),
        colors: session.deck().pairs(),
        rounds: vec![],
        best_score: store.get(),
    };
    if rounds == 0 {
        return Ok(report);
    }

    let mut timers = TimerQueue::new();
    let mut prompt = RoundBudget {
        remaining: rounds - 1,
    };
    for round in 1..=rounds {
        let (score, mismatches) = play_round(session, &mut timers)
            .with_context(|| format!("Failed to finish round {round}"))?;
        log::info!("round {round} won with {} guesses", score.guesses);
        report.rounds.push(RoundReport {
            round,
            score,
            mismatches,
        });

        let outcome = session.on_round_won(&mut *store, &mut prompt)?;
        report.best_score = Some(outcome.best_score());
        if let RoundOutcome::Finished { .. } = outcome {
            break;
        }
    }
    Ok(report)
}

/// Plays one round to the end with a [`PerfectMemory`] player.
///
/// Returns the final score and the number of mismatched pairs.
fn play_round(
    session: &mut GameSession,
    timers: &mut TimerQueue,
) -> anyhow::Result<(ScoreSnapshot, usize)> {
    let mut player = PerfectMemory::default();
    let mut transcript = Transcript;
    let mut mismatches = 0;
    session.render(&mut transcript);
    // Each card is revealed at most twice: once unseen, once to match it
    let max_steps = 2 * session.deck().len() + 1;

    for _ in 0..max_steps {
        let index = player.choose(session)?;
        let activation = session.on_card_activated(index, timers)?;
        session.apply_events(&mut transcript, &activation.events);
        player.observe(session);
        if activation.is_round_won() {
            return Ok((activation.score, mismatches));
        }

        if let Some(due) = timers.next_due() {
            mismatches += 1;
            timers.advance_to(due);
            while let Some(task) = timers.pop_due() {
                let activation = session.on_revert(task)?;
                session.apply_events(&mut transcript, &activation.events);
            }
        }
    }
    bail!("round not won after {max_steps} activations")
}

/// Writes every card change to the log.
struct Transcript;

impl Renderer for Transcript {
    fn render_deck(&mut self, deck: &Deck) {
        log::debug!("dealt {} cards", deck.len());
    }

    fn update_card(&mut self, card: &Card) {
        log::trace!("card {} {:?} {}", card.index(), card.state(), card.color());
    }
}

/// A player that remembers every card it has seen.
#[derive(Debug, Default)]
struct PerfectMemory {
    seen: HashMap<usize, Color>,
}

impl PerfectMemory {
    fn observe(&mut self, session: &GameSession) {
        for card in session.deck().cards() {
            if let Some(color) = card.visible_color() {
                self.seen.insert(card.index(), color);
            }
        }
    }

    fn choose(&self, session: &GameSession) -> anyhow::Result<usize> {
        let deck = session.deck();
        let hidden = |index: &usize| deck.cards()[*index].state().is_hidden();

        // Complete the pending card if its partner has been seen
        if let SelectionState::OnePending { first } = session.selection_state() {
            let color = deck.cards()[first].color();
            if let Some(partner) = self.seen_with(color, first).filter(hidden) {
                return Ok(partner);
            }
        } else if let Some(index) = self.known_pair(session) {
            return Ok(index);
        }

        deck.cards()
            .iter()
            .map(Card::index)
            .filter(hidden)
            .find(|index| !self.seen.contains_key(index))
            .or_else(|| deck.cards().iter().map(Card::index).find(hidden))
            .context("no hidden card left to reveal")
    }

    fn seen_with(&self, color: Color, except: usize) -> Option<usize> {
        self.seen
            .iter()
            .find(|&(&index, &seen)| index != except && seen == color)
            .map(|(&index, _)| index)
    }

    /// A hidden card whose partner is also hidden and already seen.
    fn known_pair(&self, session: &GameSession) -> Option<usize> {
        let deck = session.deck();
        let mut indices = self
            .seen
            .keys()
            .copied()
            .filter(|index| deck.cards()[*index].state().is_hidden())
            .collect::<Vec<_>>();
        indices.sort_unstable();
        indices.into_iter().find(|&index| {
            self.seen_with(self.seen[&index], index)
                .is_some_and(|partner| deck.cards()[partner].state().is_hidden())
        })
    }
}

/// Answers yes until the requested number of rounds has been played.
struct RoundBudget {
    remaining: usize,
}

impl ReplayPrompt for RoundBudget {
    fn confirm(&mut self, message: &str, best_score: usize) -> bool {
        log::debug!("{message} (best {best_score})");
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use pairs_engine::SessionConfig;

    use super::*;

    fn session(colors: usize) -> GameSession {
        let config = SessionConfig::default()
            .with_colors(colors)
            .with_seed(DeckSeed::from_bytes([11; 16]));
        GameSession::start(&config).unwrap()
    }

    #[test]
    fn test_perfect_memory_never_needs_more_than_two_looks() {
        let mut session = session(8);
        let mut timers = TimerQueue::new();
        let (score, mismatches) = play_round(&mut session, &mut timers).unwrap();

        assert_eq!(score.matches, 8);
        assert_eq!(score.progress_percent, 100);
        assert!(score.guesses >= 16);
        assert!(score.guesses <= 2 * 16);
        assert_eq!(score.guesses, 16 + 2 * mismatches);
        assert!(session.session_state().is_won());
    }

    #[test]
    fn test_simulate_plays_requested_rounds() {
        let mut session = session(4);
        let mut store = MemoryBestScoreStore::default();
        let report = simulate(&mut session, &mut store, 3).unwrap();

        assert_eq!(report.rounds.len(), 3);
        let lowest = report.rounds.iter().map(|r| r.score.guesses).min();
        assert_eq!(report.best_score, lowest);
        assert_eq!(store.get(), lowest);
        assert!(session.session_state().is_finished());
    }

    #[test]
    fn test_simulate_keeps_stored_best() {
        let mut session = session(4);
        let mut store = MemoryBestScoreStore::new(Some(1));
        let report = simulate(&mut session, &mut store, 2).unwrap();

        assert_eq!(report.best_score, Some(1));
        assert_eq!(store.get(), Some(1));
    }

    #[test]
    fn test_zero_rounds_plays_nothing() {
        let mut session = session(4);
        let mut store = MemoryBestScoreStore::default();
        let report = simulate(&mut session, &mut store, 0).unwrap();
        assert!(report.rounds.is_empty());
        assert_eq!(report.best_score, None);
    }

    #[test]
    fn test_report_serializes_seed_as_hex() {
        let mut session = session(2);
        let mut store = MemoryBestScoreStore::default();
        let report = simulate(&mut session, &mut store, 1).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seed"], "0b".repeat(16));
        assert_eq!(json["rounds"][0]["round"], 1);
    }
}
