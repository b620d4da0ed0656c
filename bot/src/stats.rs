use core::fmt;
use serde::{Deserialize, Serialize};
use sweeper_core::GameStatus;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
}

impl Stats {
    /// Counts a finished game; unfinished statuses are ignored.
    pub fn record(&mut self, status: GameStatus) {
        match status {
            GameStatus::Won => self.wins += 1,
            GameStatus::Lost => self.losses += 1,
            GameStatus::InProgress => return,
        }
        self.games += 1;
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games)
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Games: {}, Wins: {}, Losses: {}, Win rate: {:.1}%",
            self.games,
            self.wins,
            self.losses,
            100.0 * self.win_rate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_finished_games_only() {
        let mut stats = Stats::default();
        stats.record(GameStatus::Won);
        stats.record(GameStatus::Lost);
        stats.record(GameStatus::Lost);
        stats.record(GameStatus::InProgress);

        assert_eq!(
            stats,
            Stats {
                games: 3,
                wins: 1,
                losses: 2
            }
        );
        assert_eq!(
            stats.to_string(),
            "Games: 3, Wins: 1, Losses: 2, Win rate: 33.3%"
        );
    }

    #[test]
    fn serializes_as_flat_json() {
        let stats = Stats {
            games: 2,
            wins: 1,
            losses: 1,
        };
        assert_eq!(
            serde_json::to_string(&stats).unwrap(),
            r#"{"games":2,"wins":1,"losses":1}"#
        );
    }
}
