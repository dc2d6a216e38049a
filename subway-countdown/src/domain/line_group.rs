//! Feed partitions of the subway network.
//!
//! The MTA publishes trip updates as several GTFS-realtime feeds, each
//! covering a bundle of lines. Membership is an explicit table: a line code
//! belongs to a group only if it is listed for that group.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One real-time feed partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineGroupId {
    /// 1 2 3 4 5 6 and the 42 St shuttle
    Irt,
    /// 7
    Flushing,
    /// A C E plus the Rockaway and Franklin Av shuttles
    Ace,
    /// B D F M
    Bdfm,
    G,
    Jz,
    L,
    Nqrw,
    /// Staten Island Railway
    Sir,
}

impl LineGroupId {
    pub const ALL: [LineGroupId; 9] = [
        LineGroupId::Irt,
        LineGroupId::Flushing,
        LineGroupId::Ace,
        LineGroupId::Bdfm,
        LineGroupId::G,
        LineGroupId::Jz,
        LineGroupId::L,
        LineGroupId::Nqrw,
        LineGroupId::Sir,
    ];

    /// Lowercase line codes carried by this group's feed.
    ///
    /// Includes the station-list spelling `sir` and the route IDs used
    /// inside the feeds (`gs`, `fs`, `h`, `si`, express variants). The
    /// station list's bare `s` is resolved by [`LineGroupId::for_station_code`].
    pub fn codes(self) -> &'static [&'static str] {
        match self {
            LineGroupId::Irt => &["1", "2", "3", "4", "5", "5x", "6", "6x", "gs"],
            LineGroupId::Flushing => &["7", "7x"],
            LineGroupId::Ace => &["a", "c", "e", "h", "fs"],
            LineGroupId::Bdfm => &["b", "d", "f", "fx", "m"],
            LineGroupId::G => &["g"],
            LineGroupId::Jz => &["j", "z"],
            LineGroupId::L => &["l"],
            LineGroupId::Nqrw => &["n", "q", "r", "w"],
            LineGroupId::Sir => &["si", "sir"],
        }
    }

    /// Whether `code` (any case) is one of this group's lines.
    pub fn contains_code(self, code: &str) -> bool {
        let code = code.trim().to_ascii_lowercase();
        self.codes().contains(&code.as_str())
    }

    /// Every group whose table lists `code`.
    pub fn for_code(code: &str) -> impl Iterator<Item = LineGroupId> + '_ {
        Self::ALL.into_iter().filter(move |g| g.contains_code(code))
    }

    /// Groups for a line code as spelled in the station list.
    ///
    /// Every shuttle is listed as `S`. Shuttles on IRT stations run in the
    /// IRT feed; the Franklin Av and Rockaway Park shuttles run in the ACE
    /// feed.
    pub fn for_station_code(code: &str, division: &str) -> Vec<LineGroupId> {
        if code.trim().eq_ignore_ascii_case("s") {
            let group = if division.trim().eq_ignore_ascii_case("irt") {
                LineGroupId::Irt
            } else {
                LineGroupId::Ace
            };
            return vec![group];
        }
        Self::for_code(code).collect()
    }

    /// Path of this group's feed below the feed base URL.
    pub fn feed_path(self) -> &'static str {
        match self {
            LineGroupId::Irt => "nyct%2Fgtfs",
            LineGroupId::Flushing => "nyct%2Fgtfs-7",
            LineGroupId::Ace => "nyct%2Fgtfs-ace",
            LineGroupId::Bdfm => "nyct%2Fgtfs-bdfm",
            LineGroupId::G => "nyct%2Fgtfs-g",
            LineGroupId::Jz => "nyct%2Fgtfs-jz",
            LineGroupId::L => "nyct%2Fgtfs-l",
            LineGroupId::Nqrw => "nyct%2Fgtfs-nqrw",
            LineGroupId::Sir => "nyct%2Fgtfs-si",
        }
    }

    /// Short lowercase name, e.g. `ace`.
    pub fn as_str(self) -> &'static str {
        match self {
            LineGroupId::Irt => "irt",
            LineGroupId::Flushing => "7",
            LineGroupId::Ace => "ace",
            LineGroupId::Bdfm => "bdfm",
            LineGroupId::G => "g",
            LineGroupId::Jz => "jz",
            LineGroupId::L => "l",
            LineGroupId::Nqrw => "nqrw",
            LineGroupId::Sir => "si",
        }
    }
}

impl fmt::Display for LineGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
