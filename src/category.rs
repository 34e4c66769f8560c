//! Categorical signals that DB2 reports alongside numbers
//!
//! These decide whether the numeric thresholds apply at all, see
//! `evaluate::evaluate` for the precedence.

use std::fmt;
use std::str::FromStr;

/// Which kind of categorical state came with a measurement
#[derive(Debug, PartialEq, Clone)]
pub enum Category {
    /// Just a number
    Plain,
    Tablespace(TablespaceState),
    Hadr(HadrStatus),
}

/// How a tablespace allocates space
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TablespaceKind {
    /// System managed space: file per object, grows with the filesystem
    Sms,
    /// Database managed space: pre-allocated containers
    Dms,
}

/// What a tablespace is allowed to contain
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ContentType {
    Any,
    Large,
    SystemTemporary,
    UserTemporary,
}

impl ContentType {
    /// True for content that never needs to outgrow its filesystem
    pub fn is_temporary_or_any(self) -> bool {
        match self {
            ContentType::Any | ContentType::SystemTemporary | ContentType::UserTemporary => true,
            ContentType::Large => false,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct TablespaceState {
    pub kind: TablespaceKind,
    pub content: ContentType,
    /// `NORMAL`, or something like `BACKUP_PENDING`
    pub state: String,
    pub auto_resize: bool,
}

impl TablespaceState {
    pub fn is_normal(&self) -> bool {
        self.state.eq_ignore_ascii_case("NORMAL")
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HadrRole {
    Primary,
    Standby,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum HadrState {
    Peer,
    DisconnectedPeer,
    LocalCatchup,
    RemoteCatchup,
    RemoteCatchupPending,
    Disconnected,
    Other(String),
}

#[derive(Debug, PartialEq, Clone)]
pub struct HadrStatus {
    pub role: HadrRole,
    pub state: HadrState,
}

impl FromStr for TablespaceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<TablespaceKind, String> {
        match s.trim().to_uppercase().as_ref() {
            "SMS" => Ok(TablespaceKind::Sms),
            "DMS" => Ok(TablespaceKind::Dms),
            other => Err(format!("unknown tablespace type '{}'", other)),
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<ContentType, String> {
        match s.trim().to_uppercase().as_ref() {
            "ANY" => Ok(ContentType::Any),
            "LARGE" => Ok(ContentType::Large),
            "SYSTEMP" => Ok(ContentType::SystemTemporary),
            "USRTEMP" => Ok(ContentType::UserTemporary),
            other => Err(format!("unknown tablespace content type '{}'", other)),
        }
    }
}

impl FromStr for HadrRole {
    type Err = String;

    fn from_str(s: &str) -> Result<HadrRole, String> {
        match s.trim().to_uppercase().as_ref() {
            "PRIMARY" => Ok(HadrRole::Primary),
            "STANDBY" => Ok(HadrRole::Standby),
            other => Err(format!("unknown HADR role '{}'", other)),
        }
    }
}

impl FromStr for HadrState {
    type Err = String;

    /// Accepts both the `db2pd` spelling (`REMOTE_CATCHUP_PENDING`) and the
    /// snapshot spelling (`RemoteCatchupPending`)
    fn from_str(s: &str) -> Result<HadrState, String> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != ' ')
            .collect::<String>()
            .to_uppercase();
        Ok(match normalized.as_ref() {
            "PEER" => HadrState::Peer,
            "DISCONNECTEDPEER" => HadrState::DisconnectedPeer,
            "LOCALCATCHUP" => HadrState::LocalCatchup,
            "REMOTECATCHUP" => HadrState::RemoteCatchup,
            "REMOTECATCHUPPENDING" => HadrState::RemoteCatchupPending,
            "DISCONNECTED" => HadrState::Disconnected,
            _ => HadrState::Other(s.trim().to_owned()),
        })
    }
}

impl fmt::Display for HadrRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            HadrRole::Primary => write!(f, "primary"),
            HadrRole::Standby => write!(f, "standby"),
        }
    }
}

impl fmt::Display for HadrState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            HadrState::Peer => "PEER",
            HadrState::DisconnectedPeer => "DISCONNECTED_PEER",
            HadrState::LocalCatchup => "LOCAL_CATCHUP",
            HadrState::RemoteCatchup => "REMOTE_CATCHUP",
            HadrState::RemoteCatchupPending => "REMOTE_CATCHUP_PENDING",
            HadrState::Disconnected => "DISCONNECTED",
            HadrState::Other(ref other) => other.as_str(),
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod test {
    use super::{ContentType, HadrRole, HadrState, TablespaceKind};

    #[test]
    fn hadr_state_spellings() {
        assert_eq!(
            "RemoteCatchupPending".parse::<HadrState>().unwrap(),
            HadrState::RemoteCatchupPending
        );
        assert_eq!(
            "REMOTE_CATCHUP_PENDING".parse::<HadrState>().unwrap(),
            HadrState::RemoteCatchupPending
        );
        assert_eq!(
            "Disconnected".parse::<HadrState>().unwrap(),
            HadrState::Disconnected
        );
        assert_eq!(
            "WEIRD".parse::<HadrState>().unwrap(),
            HadrState::Other("WEIRD".to_owned())
        );
    }

    #[test]
    fn tablespace_columns() {
        assert_eq!("SMS".parse::<TablespaceKind>().unwrap(), TablespaceKind::Sms);
        assert_eq!(
            "USRTEMP".parse::<ContentType>().unwrap(),
            ContentType::UserTemporary
        );
        assert!(!ContentType::Large.is_temporary_or_any());
        assert!("LOB".parse::<ContentType>().is_err());
        assert!("standard".parse::<HadrRole>().is_err());
    }
}
