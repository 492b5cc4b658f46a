//! Sign-in rules for the three roles.
//!
//! These are the association's convenience rules, not a security boundary:
//! member passwords are their own mobile numbers, liaison officers share one
//! passphrase, and the manager's one-time code is shown in-band.

use std::fmt;

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use chrono::{DateTime, Utc};
use ewa_config::AccessConfig;
use ewa_domain::{mobile_digits, ManagerCreds, Member, MemberRole, RecordId};
use serde::Serialize;
use thiserror::Error;

use crate::errors::Result;
use crate::state::AppState;

const OTP_MIN: u32 = 1000;
const OTP_SPAN: u32 = 9000;
const LIAISON_ID_PREFIX: &str = "LO-";
const LIAISON_NAME: &str = "Responding Officer";
const LIAISON_DESIGNATION: &str = "Liaison Officer";
const LIAISON_POSTING: &str = "HQ";
const LIAISON_CATEGORY: &str = "N/A";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("This mobile number is not registered")]
    UnknownMobile,
    #[error("Incorrect password")]
    WrongPassword,
    #[error("A mobile number with at least {0} digits is required")]
    MobileTooShort(usize),
    #[error("Incorrect one-time code")]
    WrongCode,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Member,
    Manager,
    Liaison,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Member => "MEMBER",
            Role::Manager => "MANAGER",
            Role::Liaison => "LIAISON",
        };
        f.write_str(label)
    }
}

/// Outcome of a successful sign-in. Members and liaison officers carry the
/// member record they act as; the manager acts as nobody in particular.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub role: Role,
    pub member: Option<Member>,
}

#[derive(Debug, Clone)]
pub struct AccessRules {
    config: AccessConfig,
}

impl Default for AccessRules {
    fn default() -> Self {
        Self::new(AccessConfig::default())
    }
}

impl AccessRules {
    pub fn new(config: AccessConfig) -> Self {
        Self { config }
    }

    /// A registered member signs in with their mobile number as password.
    /// Only the digits of both entries are compared.
    pub fn member_login(
        &self,
        members: &[Member],
        mobile: &str,
        password: &str,
    ) -> std::result::Result<Session, AccessError> {
        let entered = mobile_digits(mobile);
        if entered.is_empty() {
            return Err(AccessError::UnknownMobile);
        }
        let member = members
            .iter()
            .find(|member| member.mobile_digits() == entered)
            .ok_or(AccessError::UnknownMobile)?;
        if mobile_digits(password) != entered {
            tracing::warn!(member = %member.id, "member sign-in rejected");
            return Err(AccessError::WrongPassword);
        }
        tracing::info!(member = %member.id, "member signed in");
        Ok(Session {
            role: Role::Member,
            member: Some(member.clone()),
        })
    }

    /// Liaison officers need no registration: the shared passphrase plus any
    /// long-enough mobile number yields a transient member record.
    pub fn liaison_login(
        &self,
        mobile: &str,
        password: &str,
        at: DateTime<Utc>,
    ) -> std::result::Result<Session, AccessError> {
        if password != self.config.liaison_passphrase {
            tracing::warn!("liaison sign-in rejected");
            return Err(AccessError::WrongPassword);
        }
        let digits = mobile_digits(mobile);
        if digits.len() < self.config.liaison_min_mobile_digits {
            return Err(AccessError::MobileTooShort(self.config.liaison_min_mobile_digits));
        }
        let mut officer = Member::new(LIAISON_NAME, mobile.trim(), at)
            .with_designation(LIAISON_DESIGNATION)
            .with_posting(LIAISON_POSTING)
            .with_category(LIAISON_CATEGORY)
            .with_role(MemberRole::Liaison);
        officer.id = RecordId::new(format!("{LIAISON_ID_PREFIX}{digits}"));
        tracing::info!(officer = %officer.id, "liaison officer signed in");
        Ok(Session {
            role: Role::Liaison,
            member: Some(officer),
        })
    }

    /// First manager step: the stored password, then a code is issued to the
    /// registered mobile.
    pub fn manager_login(
        &self,
        creds: &ManagerCreds,
        password: &str,
    ) -> std::result::Result<OtpChallenge, AccessError> {
        if password != creds.password {
            tracing::warn!("manager sign-in rejected");
            return Err(AccessError::WrongPassword);
        }
        Ok(OtpChallenge::issue(creds))
    }

    /// Stores new manager credentials. Requires a verified code.
    pub fn change_manager_creds(
        &self,
        _verified: &VerifiedManager,
        state: &mut AppState,
        creds: ManagerCreds,
    ) -> Result<()> {
        if creds.password.chars().count() < self.config.manager_min_password_len {
            return Err(AccessError::PasswordTooShort(self.config.manager_min_password_len).into());
        }
        state.set_manager_creds(creds)?;
        tracing::info!("manager credentials updated");
        Ok(())
    }
}

/// A pending four-digit one-time code.
pub struct OtpChallenge {
    code: u32,
    mobile: String,
}

impl OtpChallenge {
    pub fn issue(creds: &ManagerCreds) -> Self {
        let code = OTP_MIN + OsRng.next_u32() % OTP_SPAN;
        tracing::debug!("one-time code issued");
        Self {
            code,
            mobile: creds.mobile.clone(),
        }
    }

    /// The code, for in-band display to the manager.
    pub fn code(&self) -> String {
        self.code.to_string()
    }

    /// Mobile number the code is addressed to.
    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    /// Consumes the challenge; a wrong code needs a fresh one.
    pub fn verify(self, entered: &str) -> std::result::Result<VerifiedManager, AccessError> {
        if entered.trim() != self.code() {
            tracing::warn!("one-time code rejected");
            return Err(AccessError::WrongCode);
        }
        Ok(VerifiedManager { _private: () })
    }
}

impl fmt::Debug for OtpChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpChallenge")
            .field("mobile", &self.mobile)
            .finish_non_exhaustive()
    }
}

/// Proof that a one-time code was echoed back correctly.
#[derive(Debug)]
pub struct VerifiedManager {
    _private: (),
}

impl VerifiedManager {
    pub fn session(&self) -> Session {
        Session {
            role: Role::Manager,
            member: None,
        }
    }
}
