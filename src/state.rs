//! In-memory mirror of every persisted collection.
//!
//! Every mutator validates first, updates memory, then writes the whole
//! collection through the repositories before returning. A failed write is
//! logged and returned as [`AppError::Store`]; memory keeps the new value.

use chrono::{DateTime, Utc};
use ewa_config::Config;
use ewa_domain::{
    BotMessage, ChatMessage, Grievance, Holiday, Identifiable, ManagerCreds,
    Member, Notice, RecordId, Transaction,
};
use ewa_ledger::{compute_full_ledger, validate_transaction, LedgerRow, Period, PeriodStatement, Summary};
use ewa_store::{DirectoryMedium, Repositories};

use crate::errors::{AppError, Result};

const STORE_DIR: &str = "store";

pub struct AppState {
    repos: Repositories,
    max_media_chars: usize,
    members: Vec<Member>,
    transactions: Vec<Transaction>,
    chat_messages: Vec<ChatMessage>,
    bot_messages: Vec<BotMessage>,
    grievances: Vec<Grievance>,
    notices: Vec<Notice>,
    holidays: Vec<Holiday>,
    meeting_link: String,
    manager_creds: ManagerCreds,
}

impl AppState {
    /// Reads every repository once.
    pub fn initialize(repos: Repositories) -> Self {
        let state = Self {
            max_media_chars: Config::default_max_media_chars(),
            members: repos.get_members(),
            transactions: repos.get_transactions(),
            chat_messages: repos.get_chat_messages(),
            bot_messages: repos.get_bot_messages(),
            grievances: repos.get_grievances(),
            notices: repos.get_notices(),
            holidays: repos.get_holidays(),
            meeting_link: repos.get_meeting_link(),
            manager_creds: repos.get_manager_creds(),
            repos,
        };
        tracing::info!(
            members = state.members.len(),
            transactions = state.transactions.len(),
            grievances = state.grievances.len(),
            "application state initialized"
        );
        state
    }

    /// Opens the directory-backed store under the configured data directory.
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let root = config.resolve_data_dir().join(STORE_DIR);
        let medium = DirectoryMedium::new(root, config.storage.quota_bytes)?;
        let repos = Repositories::new(Box::new(medium), &config.storage)?;
        Ok(Self::initialize(repos).with_media_limit(config.max_media_chars))
    }

    pub fn with_media_limit(mut self, max_media_chars: usize) -> Self {
        self.max_media_chars = max_media_chars;
        self
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, id: &RecordId) -> Option<&Member> {
        self.members.iter().find(|member| &member.id == id)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn chat_messages(&self) -> &[ChatMessage] {
        &self.chat_messages
    }

    pub fn bot_messages(&self) -> &[BotMessage] {
        &self.bot_messages
    }

    pub fn grievances(&self) -> &[Grievance] {
        &self.grievances
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn meeting_link(&self) -> &str {
        &self.meeting_link
    }

    pub fn manager_creds(&self) -> &ManagerCreds {
        &self.manager_creds
    }

    pub fn ledger(&self) -> Vec<LedgerRow> {
        compute_full_ledger(&self.transactions)
    }

    pub fn statement(&self, period: Period) -> PeriodStatement {
        PeriodStatement::build(&self.transactions, period)
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.transactions)
    }

    pub fn add_member(&mut self, member: Member) -> Result<()> {
        validate_member(&member)?;
        ensure_new_id(&self.members, &member.id)?;
        self.members.push(member);
        persist("members", self.repos.save_members(&self.members))
    }

    pub fn update_member(&mut self, member: Member) -> Result<()> {
        validate_member(&member)?;
        let index = position(&self.members, &member.id)?;
        self.members[index] = member;
        persist("members", self.repos.save_members(&self.members))
    }

    pub fn delete_member(&mut self, id: &RecordId) -> Result<Member> {
        let index = position(&self.members, id)?;
        let removed = self.members.remove(index);
        persist("members", self.repos.save_members(&self.members))?;
        Ok(removed)
    }

    /// Appends a transaction. There is no update or delete.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<()> {
        validate_transaction(&self.transactions, &transaction)?;
        if let Some(member_id) = &transaction.member_id {
            if self.member(member_id).is_none() {
                return Err(AppError::NotFound(format!("member {member_id}")));
            }
        }
        self.transactions.push(transaction);
        persist("transactions", self.repos.save_transactions(&self.transactions))
    }

    pub fn add_grievance(&mut self, grievance: Grievance) -> Result<()> {
        if grievance.description.trim().is_empty() {
            return Err(AppError::Invalid("grievance description must not be blank".into()));
        }
        ensure_new_id(&self.grievances, &grievance.id)?;
        self.grievances.push(grievance);
        persist("grievances", self.repos.save_grievances(&self.grievances))
    }

    /// Edits the descriptive fields of a grievance.
    ///
    /// Status changes go through [`AppState::resolve_grievance`]. The reporter
    /// snapshot, report date and resolution trail always come from the stored
    /// record.
    pub fn update_grievance(&mut self, grievance: Grievance) -> Result<()> {
        let index = position(&self.grievances, &grievance.id)?;
        let current = &self.grievances[index];
        if current.status != grievance.status {
            tracing::warn!(
                id = %grievance.id,
                from = %current.status,
                to = %grievance.status,
                "rejected grievance status change through update"
            );
            return Err(AppError::Invalid(format!(
                "grievance {} cannot change status from {} to {} by update",
                grievance.id, current.status, grievance.status
            )));
        }
        if grievance.description.trim().is_empty() {
            return Err(AppError::Invalid("grievance description must not be blank".into()));
        }
        let Grievance {
            description,
            formation,
            addressed_to,
            ..
        } = grievance;
        let stored = &mut self.grievances[index];
        stored.description = description;
        stored.formation = formation;
        stored.addressed_to = addressed_to;
        persist("grievances", self.repos.save_grievances(&self.grievances))
    }

    pub fn resolve_grievance(
        &mut self,
        id: &RecordId,
        action_taken: &str,
        resolved_at: DateTime<Utc>,
    ) -> Result<()> {
        if action_taken.trim().is_empty() {
            return Err(AppError::Invalid("action taken must not be blank".into()));
        }
        let index = position(&self.grievances, id)?;
        if !self.grievances[index].resolve(action_taken.trim(), resolved_at) {
            return Err(AppError::Invalid(format!("grievance {id} is already resolved")));
        }
        persist("grievances", self.repos.save_grievances(&self.grievances))
    }

    pub fn add_notice(&mut self, notice: Notice) -> Result<()> {
        if notice.title.trim().is_empty() {
            return Err(AppError::Invalid("notice title must not be blank".into()));
        }
        ensure_new_id(&self.notices, &notice.id)?;
        self.notices.push(notice);
        persist("notices", self.repos.save_notices(&self.notices))
    }

    pub fn delete_notice(&mut self, id: &RecordId) -> Result<Notice> {
        let index = position(&self.notices, id)?;
        let removed = self.notices.remove(index);
        persist("notices", self.repos.save_notices(&self.notices))?;
        Ok(removed)
    }

    pub fn add_holiday(&mut self, holiday: Holiday) -> Result<()> {
        if holiday.name.trim().is_empty() {
            return Err(AppError::Invalid("holiday name must not be blank".into()));
        }
        ensure_new_id(&self.holidays, &holiday.id)?;
        self.holidays.push(holiday);
        persist("holidays", self.repos.save_holidays(&self.holidays))
    }

    pub fn delete_holiday(&mut self, id: &RecordId) -> Result<Holiday> {
        let index = position(&self.holidays, id)?;
        let removed = self.holidays.remove(index);
        persist("holidays", self.repos.save_holidays(&self.holidays))?;
        Ok(removed)
    }

    /// Appends to the group chat. Media payloads over the configured size are
    /// turned away before anything changes.
    pub fn add_chat_message(&mut self, message: ChatMessage) -> Result<()> {
        let size = message.content.len();
        if message.is_media() && size > self.max_media_chars {
            tracing::warn!(size, limit = self.max_media_chars, "rejected oversized media message");
            return Err(AppError::PayloadTooLarge {
                size,
                limit: self.max_media_chars,
            });
        }
        if !message.is_media() && message.content.trim().is_empty() {
            return Err(AppError::Invalid("message must not be blank".into()));
        }
        self.chat_messages.push(message);
        persist("chat messages", self.repos.save_chat_messages(&self.chat_messages))
    }

    pub fn add_bot_message(&mut self, message: BotMessage) -> Result<()> {
        self.bot_messages.push(message);
        persist("bot messages", self.repos.save_bot_messages(&self.bot_messages))
    }

    pub fn set_meeting_link(&mut self, link: impl Into<String>) -> Result<()> {
        self.meeting_link = link.into().trim().to_string();
        persist("meeting link", self.repos.save_meeting_link(&self.meeting_link))
    }

    pub fn set_manager_creds(&mut self, creds: ManagerCreds) -> Result<()> {
        self.manager_creds = creds;
        persist("manager credentials", self.repos.save_manager_creds(&self.manager_creds))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("members", &self.members.len())
            .field("transactions", &self.transactions.len())
            .field("grievances", &self.grievances.len())
            .field("notices", &self.notices.len())
            .field("holidays", &self.holidays.len())
            .finish_non_exhaustive()
    }
}

fn persist(collection: &'static str, outcome: ewa_store::Result<()>) -> Result<()> {
    outcome.map_err(|err| {
        tracing::error!(collection, error = %err, "failed to persist; in-memory state kept");
        AppError::Store(err)
    })
}

fn validate_member(member: &Member) -> Result<()> {
    if member.name.trim().is_empty() {
        return Err(AppError::Invalid("member name must not be blank".into()));
    }
    if member.mobile.trim().is_empty() {
        return Err(AppError::Invalid("member mobile must not be blank".into()));
    }
    Ok(())
}

fn position<T: Identifiable>(items: &[T], id: &RecordId) -> Result<usize> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

fn ensure_new_id<T: Identifiable>(items: &[T], id: &RecordId) -> Result<()> {
    if id.is_blank() {
        return Err(AppError::Invalid("record id must not be blank".into()));
    }
    if items.iter().any(|item| item.id() == id) {
        return Err(AppError::Invalid(format!("record id {id} already exists")));
    }
    Ok(())
}
