//! Seoul districts offered in the selection menu.
//!
//! One table drives the button grid, callback dispatch and the address
//! filter, so the three can never disagree.

use std::fmt;

use crate::config::CallbackMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum District {
    Mapo,
    Jongno,
    Gangnam,
    Songpa,
    Jung,
    Seodaemun,
    Yeongdeungpo,
    Yongsan,
}

impl District {
    /// All districts in menu order
    pub const ALL: [District; 8] = [
        District::Mapo,
        District::Jongno,
        District::Gangnam,
        District::Songpa,
        District::Jung,
        District::Seodaemun,
        District::Yeongdeungpo,
        District::Yongsan,
    ];

    /// Buttons per menu row; two rows of four
    pub const MENU_ROW_LEN: usize = 4;

    /// Korean label, used as button caption, callback token and address filter
    pub fn label(self) -> &'static str {
        match self {
            District::Mapo => "마포구",
            District::Jongno => "종로구",
            District::Gangnam => "강남구",
            District::Songpa => "송파구",
            District::Jung => "중구",
            District::Seodaemun => "서대문구",
            District::Yeongdeungpo => "영등포구",
            District::Yongsan => "용산구",
        }
    }

    /// Menu layout as rows of districts
    pub fn menu_rows() -> impl Iterator<Item = &'static [District]> {
        Self::ALL.chunks(Self::MENU_ROW_LEN)
    }

    /// Resolve a callback payload to a district.
    ///
    /// With [`CallbackMatch::Substring`] the first district in menu order whose
    /// label occurs anywhere in the payload wins.
    pub fn from_callback(token: &str, policy: CallbackMatch) -> Option<District> {
        match policy {
            CallbackMatch::Exact => Self::ALL.into_iter().find(|d| d.label() == token),
            CallbackMatch::Substring => Self::ALL.into_iter().find(|d| token.contains(d.label())),
        }
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
