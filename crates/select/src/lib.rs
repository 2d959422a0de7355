#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Ranking and final choice among probed snapshot candidates

mod prompt;

pub use prompt::{ConsolePrompt, DialoguerPrompt, Prompt, PromptOption};

use snapfind_errors::{Error, SelectionError};
use snapfind_events::{
    AppEvent, EventEmitter, EventSender, RankedEntry, SelectionEvent, SelectionKind,
};
use snapfind_types::{Candidate, RankBy, SelectionMode};
use std::cmp::Ordering;
use std::time::Duration;

/// Order candidates best first; ties keep their input order
pub fn rank(candidates: &mut [Candidate], by: RankBy) {
    match by {
        RankBy::Rate => candidates.sort_by(|a, b| b.rate.total_cmp(&a.rate)),
        RankBy::Eta => {
            candidates.sort_by(|a, b| compare_estimates(a.estimated_time, b.estimated_time));
        }
    }
}

/// Shorter first, unknown estimates last
fn compare_estimates(a: Option<Duration>, b: Option<Duration>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The outcome of a selection
#[derive(Debug, Clone)]
pub struct Selection {
    pub candidate: Candidate,
    pub kind: SelectionKind,
    /// Every candidate, best first
    pub ranked: Vec<Candidate>,
}

/// Picks one candidate from a probed set
#[derive(Debug, Clone, Copy, Default)]
pub struct Selector {
    mode: SelectionMode,
    rank_by: RankBy,
}

impl Selector {
    #[must_use]
    pub fn new(mode: SelectionMode, rank_by: RankBy) -> Self {
        Self { mode, rank_by }
    }

    /// Rank `candidates` and choose one
    ///
    /// A single candidate is taken without consulting the prompt. Otherwise
    /// automatic mode takes the best ranked candidate and manual mode asks
    /// `prompt` until it answers with a valid position.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::EmptyCandidateSet` for an empty input,
    /// `SelectionError::PromptClosed` if the prompt runs out of input, or a
    /// prompt failure.
    pub fn select(
        &self,
        mut candidates: Vec<Candidate>,
        prompt: &mut dyn Prompt,
        tx: &EventSender,
    ) -> Result<Selection, Error> {
        if candidates.is_empty() {
            return Err(SelectionError::EmptyCandidateSet.into());
        }

        rank(&mut candidates, self.rank_by);
        tx.emit(AppEvent::Selection(SelectionEvent::Ranked {
            ranked: candidates
                .iter()
                .enumerate()
                .map(|(index, c)| RankedEntry {
                    position: index + 1,
                    provider: c.provider.clone(),
                    rate: c.rate,
                    estimated_time: c.estimated_time,
                })
                .collect(),
        }));

        let (index, kind) = if candidates.len() == 1 {
            (0, SelectionKind::OnlyCandidate)
        } else {
            match self.mode {
                SelectionMode::Auto => (0, SelectionKind::Automatic),
                SelectionMode::Manual => (ask(&candidates, prompt, tx)?, SelectionKind::Manual),
            }
        };

        let candidate = candidates[index].clone();
        tx.emit(AppEvent::Selection(SelectionEvent::Selected {
            provider: candidate.provider.clone(),
            url: candidate.url.clone(),
            rate: candidate.rate,
            kind,
        }));

        Ok(Selection {
            candidate,
            kind,
            ranked: candidates,
        })
    }
}

/// Zero-based index of the user's choice
fn ask(ranked: &[Candidate], prompt: &mut dyn Prompt, tx: &EventSender) -> Result<usize, Error> {
    let count = ranked.len();
    prompt.show(&PromptOption::from_ranked(ranked))?;

    loop {
        let Some(input) = prompt.read_choice(count)? else {
            return Err(SelectionError::PromptClosed.into());
        };

        match input.parse::<usize>() {
            Ok(choice) if (1..=count).contains(&choice) => return Ok(choice - 1),
            _ => {
                tx.emit(AppEvent::Selection(SelectionEvent::ChoiceRejected {
                    input: input.clone(),
                    max: count,
                }));
                prompt.reject(&input, count)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use snapfind_events::channel;
    use std::collections::VecDeque;

    /// Answers from a fixed script, then reports end of input
    #[derive(Default)]
    struct ScriptedPrompt {
        answers: VecDeque<&'static str>,
        shown: Vec<PromptOption>,
        asked: usize,
        rejected: Vec<String>,
    }

    impl ScriptedPrompt {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn show(&mut self, options: &[PromptOption]) -> Result<(), SelectionError> {
            self.shown = options.to_vec();
            Ok(())
        }

        fn read_choice(&mut self, _count: usize) -> Result<Option<String>, SelectionError> {
            self.asked += 1;
            Ok(self.answers.pop_front().map(str::to_string))
        }

        fn reject(&mut self, input: &str, _count: usize) -> Result<(), SelectionError> {
            self.rejected.push(input.to_string());
            Ok(())
        }
    }

    fn candidate(provider: &str, rate: f64, eta_secs: Option<u64>) -> Candidate {
        let mut c = Candidate::new(provider, format!("https://{provider}/snap.tar"), None);
        c.rate = rate;
        c.estimated_time = eta_secs.map(Duration::from_secs);
        c
    }

    fn providers(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.provider.as_str()).collect()
    }

    #[test]
    fn rank_by_rate_is_descending_and_stable() {
        let mut list = vec![
            candidate("a", 2.0, None),
            candidate("b", 5.0, None),
            candidate("c", 2.0, None),
            candidate("d", 0.0, None),
        ];
        rank(&mut list, RankBy::Rate);
        assert_eq!(providers(&list), ["b", "a", "c", "d"]);
    }

    #[test]
    fn rank_by_eta_puts_unknown_last() {
        let mut list = vec![
            candidate("a", 9.0, None),
            candidate("b", 1.0, Some(30)),
            candidate("c", 2.0, Some(10)),
            candidate("d", 0.0, None),
        ];
        rank(&mut list, RankBy::Eta);
        assert_eq!(providers(&list), ["c", "b", "a", "d"]);
    }

    #[test]
    fn auto_mode_takes_the_fastest() {
        let (tx, _rx) = channel();
        let mut prompt = ScriptedPrompt::default();
        let selection = Selector::new(SelectionMode::Auto, RankBy::Rate)
            .select(
                vec![candidate("slow", 2.0, None), candidate("fast", 5.0, None)],
                &mut prompt,
                &tx,
            )
            .unwrap();

        assert_eq!(selection.candidate.provider, "fast");
        assert_eq!(selection.kind, SelectionKind::Automatic);
        assert_eq!(providers(&selection.ranked), ["fast", "slow"]);
        assert_eq!(prompt.asked, 0);
    }

    #[test]
    fn single_candidate_skips_the_prompt() {
        let (tx, _rx) = channel();
        let mut prompt = ScriptedPrompt::default();
        let selection = Selector::new(SelectionMode::Manual, RankBy::Rate)
            .select(vec![candidate("only", 0.0, None)], &mut prompt, &tx)
            .unwrap();

        assert_eq!(selection.candidate.provider, "only");
        assert_eq!(selection.kind, SelectionKind::OnlyCandidate);
        assert_eq!(prompt.asked, 0);
        assert!(prompt.shown.is_empty());
    }

    #[test]
    fn manual_mode_reprompts_until_valid() {
        let (tx, mut rx) = channel();
        let mut prompt = ScriptedPrompt::new(&["0", "abc", "2"]);
        let selection = Selector::new(SelectionMode::Manual, RankBy::Rate)
            .select(
                vec![
                    candidate("a", 1.0, None),
                    candidate("b", 3.0, None),
                    candidate("c", 2.0, None),
                ],
                &mut prompt,
                &tx,
            )
            .unwrap();

        // ranked: b, c, a
        assert_eq!(selection.candidate.provider, "c");
        assert_eq!(selection.kind, SelectionKind::Manual);
        assert_eq!(prompt.asked, 3);
        assert_eq!(prompt.rejected, ["0", "abc"]);
        assert_eq!(
            prompt.shown.iter().map(ToString::to_string).collect::<Vec<_>>(),
            [
                "1. b (0.00 MB/s)",
                "2. c (0.00 MB/s)",
                "3. a (0.00 MB/s)"
            ]
        );

        let mut rejections = 0;
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Selection(SelectionEvent::ChoiceRejected { max, .. }) = event {
                assert_eq!(max, 3);
                rejections += 1;
            }
        }
        assert_eq!(rejections, 2);
    }

    #[test]
    fn manual_mode_fails_when_input_ends() {
        let (tx, _rx) = channel();
        let mut prompt = ScriptedPrompt::new(&["7"]);
        let err = Selector::new(SelectionMode::Manual, RankBy::Rate)
            .select(
                vec![candidate("a", 1.0, None), candidate("b", 2.0, None)],
                &mut prompt,
                &tx,
            )
            .unwrap_err();
        assert!(matches!(err, Error::Selection(SelectionError::PromptClosed)));
    }

    #[test]
    fn empty_set_is_an_error() {
        let (tx, _rx) = channel();
        let err = Selector::default()
            .select(Vec::new(), &mut ScriptedPrompt::default(), &tx)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Selection(SelectionError::EmptyCandidateSet)
        ));
    }

    proptest! {
        #[test]
        fn rate_ranking_is_a_stable_descending_permutation(
            rates in prop::collection::vec(prop::sample::select(vec![0.0, 1.0, 2.5, 7.0]), 0..12)
        ) {
            let mut list: Vec<Candidate> = rates
                .iter()
                .enumerate()
                .map(|(i, rate)| candidate(&i.to_string(), *rate, None))
                .collect();
            rank(&mut list, RankBy::Rate);

            prop_assert_eq!(list.len(), rates.len());
            for pair in list.windows(2) {
                prop_assert!(pair[0].rate >= pair[1].rate);
                if (pair[0].rate - pair[1].rate).abs() < f64::EPSILON {
                    let a: usize = pair[0].provider.parse().unwrap();
                    let b: usize = pair[1].provider.parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }
    }
}
