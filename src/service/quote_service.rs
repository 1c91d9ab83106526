use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::config::autosave_conf::AutosaveConfig;
use crate::dto::quote_dto::{LineItemView, QuoteInput, QuoteResponseDto, QuoteSummary};
use crate::model::quote::{Quote, QuoteStatus};
use crate::repository::quote_repo::QuoteRepository;
use crate::util::attention::{triage_attention, AttentionItem};
use crate::util::autosave::{AutosaveController, AutosaveSnapshot, SaveError, SaveOperation};
use crate::util::error::ServiceError;
use crate::util::format::{format_currency, time_since};
use crate::util::profit::{calculate_profit, ProfitBreakdown};
use crate::util::quote_health::{evaluate_quote_health, HealthWarning};

#[async_trait]
pub trait QuoteService: Send + Sync {
	// Quote CRUD
	async fn create_quote(&self, input: QuoteInput) -> Result<Quote, ServiceError>;
	async fn get_quote(&self, id: ObjectId) -> Result<QuoteResponseDto, ServiceError>;
	async fn update_quote(&self, id: ObjectId, input: QuoteInput) -> Result<Quote, ServiceError>;
	async fn update_quote_status(&self, id: ObjectId, status: QuoteStatus) -> Result<Quote, ServiceError>;
	async fn delete_quote(&self, id: ObjectId) -> Result<(), ServiceError>;
	async fn list_quotes(&self, status: Option<QuoteStatus>, page: u32, limit: u32) -> Result<Vec<Quote>, ServiceError>;

	// Derived views
	async fn quote_health(&self, id: ObjectId) -> Result<Vec<HealthWarning>, ServiceError>;
	async fn quote_profit(&self, id: ObjectId) -> Result<ProfitBreakdown, ServiceError>;
	async fn attention(&self, now: DateTime<Utc>) -> Result<Vec<AttentionItem>, ServiceError>;
	async fn summary(&self) -> Result<QuoteSummary, ServiceError>;

	// Autosaved drafts
	async fn save_draft(&self, id: ObjectId, input: QuoteInput) -> Result<AutosaveSnapshot, ServiceError>;
	async fn flush_draft(&self, id: ObjectId) -> Result<AutosaveSnapshot, ServiceError>;
	fn draft_status(&self, id: ObjectId) -> Option<AutosaveSnapshot>;
	fn discard_draft(&self, id: ObjectId) -> bool;
}

pub fn health_of(quote: &Quote) -> Vec<HealthWarning> {
	evaluate_quote_health(
		&quote.customer_name,
		quote.customer_email.as_deref().unwrap_or_default(),
		&quote.line_items,
		quote.labor_hours,
		quote.markup_percent,
	)
}

pub fn profit_of(quote: &Quote) -> ProfitBreakdown {
	calculate_profit(quote.material_cost(), quote.labor_cost(), quote.total)
}

/// Status counts and pipeline totals over a set of quotes.
pub fn summarize(quotes: &[Quote]) -> QuoteSummary {
	let mut counts: BTreeMap<String, u64> = QuoteStatus::ALL
		.iter()
		.map(|s| (s.as_str().to_string(), 0))
		.collect();
	let mut pipeline_value = 0.0;
	let mut won_value = 0.0;

	for quote in quotes {
		*counts.entry(quote.status.as_str().to_string()).or_default() += 1;
		match quote.status {
			QuoteStatus::Sent => pipeline_value += quote.total,
			QuoteStatus::Accepted => won_value += quote.total,
			QuoteStatus::Draft | QuoteStatus::Declined | QuoteStatus::Expired => {}
		}
	}

	let accepted = counts[QuoteStatus::Accepted.as_str()];
	let decided = accepted + counts[QuoteStatus::Declined.as_str()];
	let win_rate_percent = if decided > 0 {
		accepted as f64 / decided as f64 * 100.0
	} else {
		0.0
	};

	QuoteSummary { counts, pipeline_value, won_value, win_rate_percent }
}

/// Latest unsaved input of one draft session. `revision` grows with every edit.
#[derive(Default)]
struct DraftState {
	revision: u64,
	input: Option<QuoteInput>,
}

type SharedDraft = Arc<Mutex<DraftState>>;
type DraftMap = Mutex<HashMap<ObjectId, DraftSession>>;

fn lock_draft(draft: &SharedDraft) -> MutexGuard<'_, DraftState> {
	draft.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn lock_map(drafts: &DraftMap) -> MutexGuard<'_, HashMap<ObjectId, DraftSession>> {
	drafts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Writes the most recent draft of one quote, then closes the session if no
/// newer edit arrived meanwhile.
struct DraftSaver {
	quote_repo: Arc<dyn QuoteRepository>,
	quote_id: ObjectId,
	draft: SharedDraft,
	drafts: Weak<DraftMap>,
}

impl DraftSaver {
	/// Whether this saver still belongs to the open session of its quote.
	fn is_open(&self, drafts: &HashMap<ObjectId, DraftSession>) -> bool {
		drafts
			.get(&self.quote_id)
			.is_some_and(|session| Arc::ptr_eq(&session.draft, &self.draft))
	}

	fn close_if_settled(&self, saved_revision: u64) {
		let Some(drafts) = self.drafts.upgrade() else {
			return;
		};
		let closed = {
			let mut map = lock_map(&drafts);
			let settled = self.is_open(&map) && lock_draft(&self.draft).revision == saved_revision;
			if settled { map.remove(&self.quote_id) } else { None }
		};
		if closed.is_some() {
			debug!(id = %self.quote_id, "Draft stored, session closed");
		}
	}
}

#[async_trait]
impl SaveOperation for DraftSaver {
	async fn save(&self) -> Result<(), SaveError> {
		let (revision, draft) = {
			let state = lock_draft(&self.draft);
			(state.revision, state.input.clone())
		};
		let Some(draft) = draft else {
			return Ok(());
		};

		let mut quote = self
			.quote_repo
			.get_by_id(self.quote_id)
			.await
			.map_err(|e| SaveError::Failed(e.to_string()))?;

		// an explicit update or delete discards the session; its draft is stale
		let still_open = match self.drafts.upgrade() {
			Some(drafts) => {
				let map = lock_map(&drafts);
				self.is_open(&map)
			}
			None => false,
		};
		if !still_open {
			debug!(id = %self.quote_id, "Draft discarded before it was stored");
			return Ok(());
		}

		draft.apply_to(&mut quote, Utc::now()).map_err(SaveError::Failed)?;
		self.quote_repo
			.update(self.quote_id, quote)
			.await
			.map_err(|e| SaveError::Failed(e.to_string()))?;

		self.close_if_settled(revision);
		Ok(())
	}
}

struct DraftSession {
	draft: SharedDraft,
	controller: Arc<AutosaveController>,
}

pub struct QuoteServiceImpl {
	pub quote_repo: Arc<dyn QuoteRepository>,
	pub autosave_config: AutosaveConfig,
	// open until the latest draft is stored or discarded
	drafts: Arc<DraftMap>,
}

impl QuoteServiceImpl {
	pub fn new(quote_repo: Arc<dyn QuoteRepository>, autosave_config: AutosaveConfig) -> Self {
		QuoteServiceImpl {
			quote_repo,
			autosave_config,
			drafts: Arc::new(Mutex::new(HashMap::new())),
		}
	}

	fn lock_drafts(&self) -> MutexGuard<'_, HashMap<ObjectId, DraftSession>> {
		lock_map(&self.drafts)
	}

	/// Open draft sessions, for monitoring.
	pub fn open_drafts(&self) -> usize {
		self.lock_drafts().len()
	}

	async fn next_quote_number(&self, now: DateTime<Utc>) -> Result<String, ServiceError> {
		let year = now.year();
		let seq = self.quote_repo.next_sequence(year).await.map_err(|e| {
			error!("Failed to allocate quote number: {e}");
			ServiceError::from(e)
		})?;
		Ok(format!("Q-{}-{:04}", year, seq))
	}

	async fn fetch(&self, id: ObjectId) -> Result<Quote, ServiceError> {
		self.quote_repo.get_by_id(id).await.map_err(|e| {
			error!("Failed to fetch quote: {e}");
			ServiceError::from(e)
		})
	}
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
	#[instrument(skip(self, input), fields(customer = %input.customer_name))]
	async fn create_quote(&self, input: QuoteInput) -> Result<Quote, ServiceError> {
		info!("Creating quote");
		let now = Utc::now();
		let quote_number = self.next_quote_number(now).await?;
		let quote = input
			.into_new_quote(quote_number, now)
			.map_err(ServiceError::InvalidInput)?;

		let res = self.quote_repo.create(quote).await;
		match &res {
			Ok(q) => info!(quote_number = %q.quote_number, total = q.total, "Quote created successfully"),
			Err(e) => error!("Failed to create quote: {e}"),
		}
		res.map_err(ServiceError::from)
	}

	#[instrument(skip(self), fields(id = %id))]
	async fn get_quote(&self, id: ObjectId) -> Result<QuoteResponseDto, ServiceError> {
		info!("Getting quote by id");
		let quote = self.fetch(id).await?;
		let now = Utc::now();

		let line_items = quote
			.line_items
			.iter()
			.map(|item| LineItemView { item: item.clone(), subtotal: item.subtotal() })
			.collect();

		Ok(QuoteResponseDto {
			line_items,
			total_display: format_currency(quote.total),
			last_updated: time_since(quote.updated_at, now),
			warnings: health_of(&quote),
			profit: profit_of(&quote),
			quote,
		})
	}

	#[instrument(skip(self, input), fields(id = %id))]
	async fn update_quote(&self, id: ObjectId, input: QuoteInput) -> Result<Quote, ServiceError> {
		info!("Updating quote");
		let mut quote = self.fetch(id).await?;
		if self.discard_draft(id) {
			info!("Pending draft dropped in favour of the explicit update");
		}
		input.apply_to(&mut quote, Utc::now()).map_err(ServiceError::InvalidInput)?;

		let res = self.quote_repo.update(id, quote).await;
		match &res {
			Ok(_) => info!("Quote updated successfully"),
			Err(e) => error!("Failed to update quote: {e}"),
		}
		res.map_err(ServiceError::from)
	}

	#[instrument(skip(self), fields(id = %id, status = %status))]
	async fn update_quote_status(&self, id: ObjectId, status: QuoteStatus) -> Result<Quote, ServiceError> {
		info!("Updating quote status");
		let res = self.quote_repo.update_status(id, status).await;
		match &res {
			Ok(_) => info!("Quote status updated successfully"),
			Err(e) => error!("Failed to update quote status: {e}"),
		}
		res.map_err(ServiceError::from)
	}

	#[instrument(skip(self), fields(id = %id))]
	async fn delete_quote(&self, id: ObjectId) -> Result<(), ServiceError> {
		info!("Deleting quote");
		self.discard_draft(id);
		let res = self.quote_repo.delete(id).await;
		match &res {
			Ok(_) => info!("Quote deleted successfully"),
			Err(e) => error!("Failed to delete quote: {e}"),
		}
		res.map_err(ServiceError::from)
	}

	#[instrument(skip(self))]
	async fn list_quotes(&self, status: Option<QuoteStatus>, page: u32, limit: u32) -> Result<Vec<Quote>, ServiceError> {
		info!("Listing quotes");
		let res = self.quote_repo.list(status, page, limit).await;
		match &res {
			Ok(quotes) => info!("Fetched {} quotes", quotes.len()),
			Err(e) => error!("Failed to list quotes: {e}"),
		}
		res.map_err(ServiceError::from)
	}

	#[instrument(skip(self), fields(id = %id))]
	async fn quote_health(&self, id: ObjectId) -> Result<Vec<HealthWarning>, ServiceError> {
		let quote = self.fetch(id).await?;
		Ok(health_of(&quote))
	}

	#[instrument(skip(self), fields(id = %id))]
	async fn quote_profit(&self, id: ObjectId) -> Result<ProfitBreakdown, ServiceError> {
		let quote = self.fetch(id).await?;
		Ok(profit_of(&quote))
	}

	#[instrument(skip(self))]
	async fn attention(&self, now: DateTime<Utc>) -> Result<Vec<AttentionItem>, ServiceError> {
		let quotes = self
			.quote_repo
			.list_by_statuses(&[QuoteStatus::Sent, QuoteStatus::Draft])
			.await
			.map_err(ServiceError::from)?;
		let items = triage_attention(&quotes, now);
		info!("{} quote(s) need attention", items.len());
		Ok(items)
	}

	#[instrument(skip(self))]
	async fn summary(&self) -> Result<QuoteSummary, ServiceError> {
		let quotes = self
			.quote_repo
			.list_by_statuses(&QuoteStatus::ALL)
			.await
			.map_err(ServiceError::from)?;
		Ok(summarize(&quotes))
	}

	#[instrument(skip(self, input), fields(id = %id))]
	async fn save_draft(&self, id: ObjectId, input: QuoteInput) -> Result<AutosaveSnapshot, ServiceError> {
		// reject bad rows now rather than inside the deferred save
		input.line_items().map_err(ServiceError::InvalidInput)?;

		let has_session = self.lock_drafts().contains_key(&id);
		if !has_session {
			self.fetch(id).await?;
		}

		let mut drafts = self.lock_drafts();
		let session = drafts.entry(id).or_insert_with(|| {
			info!("Opening draft session");
			let draft = SharedDraft::default();
			let saver = DraftSaver {
				quote_repo: Arc::clone(&self.quote_repo),
				quote_id: id,
				draft: Arc::clone(&draft),
				drafts: Arc::downgrade(&self.drafts),
			};
			let controller = AutosaveController::new(self.autosave_config.clone(), Arc::new(saver));
			DraftSession { draft, controller: Arc::new(controller) }
		});

		{
			let mut state = lock_draft(&session.draft);
			state.revision += 1;
			state.input = Some(input);
		}
		session.controller.mark_dirty();
		if !session.controller.is_enabled() {
			warn!("Autosave disabled, draft kept in memory only");
		}
		Ok(session.controller.snapshot())
	}

	#[instrument(skip(self), fields(id = %id))]
	async fn flush_draft(&self, id: ObjectId) -> Result<AutosaveSnapshot, ServiceError> {
		let controller = self
			.lock_drafts()
			.get(&id)
			.map(|session| Arc::clone(&session.controller))
			.ok_or_else(|| ServiceError::NotFound(format!("No draft session for quote {}", id)))?;
		controller.trigger_save().await;
		Ok(controller.snapshot())
	}

	fn draft_status(&self, id: ObjectId) -> Option<AutosaveSnapshot> {
		self.lock_drafts().get(&id).map(|session| session.controller.snapshot())
	}

	fn discard_draft(&self, id: ObjectId) -> bool {
		let removed = self.lock_drafts().remove(&id);
		match removed {
			Some(session) => {
				session.controller.teardown();
				lock_draft(&session.draft).input = None;
				info!(%id, "Draft session discarded");
				true
			}
			None => false,
		}
	}
}
