use crate::error::LedgerError;
use serde::{Deserialize, Serialize};

/// The authenticated staff member issuing a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Rejects commands that arrive without an identity.
pub fn require_caller(caller: Option<&Caller>) -> Result<&Caller, LedgerError> {
    match caller {
        Some(caller) if !caller.id.trim().is_empty() => Ok(caller),
        _ => Err(LedgerError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_caller() {
        let caller = Caller {
            id: "u1".into(),
            email: "desk@hotel.test".into(),
            name: "Front Desk".into(),
        };
        assert_eq!(require_caller(Some(&caller)).unwrap().id, "u1");
        assert!(matches!(require_caller(None), Err(LedgerError::Unauthorized)));

        let blank = Caller {
            id: " ".into(),
            email: String::new(),
            name: String::new(),
        };
        assert!(matches!(
            require_caller(Some(&blank)),
            Err(LedgerError::Unauthorized)
        ));
    }
}
