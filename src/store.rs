//! The document store: the single owner of the session state.
//!
//! Every mutation works on a copy of the state and swaps it in whole, then
//! writes the persisted subset to storage. A failed write is logged and the
//! in-memory state stays authoritative.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::commands::{DocumentField, LabelKey, LineItemField, TemplateField};
use crate::error::StorageError;
use crate::labels;
use crate::model::{
    DocumentData, DocumentType, LineItem, Locale, PaperSize, TemplateType, Theme, new_item_id,
};
use crate::storage::{PersistedState, StateStorage};
use crate::totals::Totals;

pub struct DocumentStore<S: StateStorage> {
    storage: S,
    state: PersistedState,
    show_settings: bool,
}

impl<S: StateStorage> DocumentStore<S> {
    /// Load the stored session, or start a new one in the host locale.
    pub fn open(storage: S) -> Result<Self, StorageError> {
        Self::open_or_create(storage, Locale::detect(), Local::now().date_naive())
    }

    /// Load the stored session, or start a new one with `locale` dated `today`.
    /// A fresh session is not written until its first mutation.
    pub fn open_or_create(
        storage: S,
        locale: Locale,
        today: NaiveDate,
    ) -> Result<Self, StorageError> {
        match storage.load()? {
            Some(state) => {
                debug!(number = %state.document_data.document_number, "loaded stored document");
                Ok(Self::with_state(storage, state))
            }
            None => {
                info!(%locale, "no stored document, starting a new one");
                Ok(Self::create(storage, locale, today))
            }
        }
    }

    /// Start a new session without reading what `storage` holds. Whatever is
    /// stored is replaced on the first mutation.
    pub fn create(storage: S, locale: Locale, today: NaiveDate) -> Self {
        Self::with_state(storage, fresh_state(locale, today))
    }

    fn with_state(storage: S, state: PersistedState) -> Self {
        Self {
            storage,
            state,
            show_settings: false,
        }
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn document(&self) -> &DocumentData {
        &self.state.document_data
    }

    pub fn totals(&self) -> Totals {
        Totals::for_document(&self.state.document_data)
    }

    pub fn show_settings(&self) -> bool {
        self.show_settings
    }

    /// Replace the whole document. No validation.
    pub fn set_document_data(&mut self, data: DocumentData) {
        self.commit(|state| state.document_data = data);
    }

    pub fn update_field(&mut self, field: DocumentField) {
        self.commit(|state| field.apply(&mut state.document_data));
    }

    pub fn update_template_field(&mut self, field: TemplateField) {
        self.commit(|state| field.apply(&mut state.document_data.template));
    }

    /// Override one label. Kept until the next locale or type change.
    pub fn update_label_field(&mut self, key: LabelKey, value: impl Into<String>) {
        let value = value.into();
        self.commit(|state| state.document_data.template.labels.set(key, value));
    }

    /// Append a blank item that starts from the document's currency and tax
    /// rate. Returns the new item's id.
    pub fn add_line_item(&mut self) -> String {
        let doc = &self.state.document_data;
        let mut id = new_item_id();
        while doc.item(&id).is_some() {
            id = new_item_id();
        }

        let item = LineItem {
            id: id.clone(),
            currency: Some(doc.template.currency.clone()),
            tax_rate: Some(doc.template.tax_rate),
            ..LineItem::blank()
        };
        self.commit(|state| state.document_data.items.push(item));
        debug!(%id, "line item added");
        id
    }

    /// Remove the item with `id`. The last remaining item is never removed.
    /// Returns whether anything changed.
    pub fn remove_line_item(&mut self, id: &str) -> bool {
        let items = &self.state.document_data.items;
        if items.len() <= 1 {
            debug!(%id, "refusing to remove the only line item");
            return false;
        }
        if !items.iter().any(|i| i.id == id) {
            debug!(%id, "no line item to remove");
            return false;
        }

        self.commit(|state| state.document_data.items.retain(|i| i.id != id));
        true
    }

    /// Apply `field` to the item with `id`, recomputing its amount when the
    /// change affects it. Returns whether the item exists.
    pub fn update_line_item(&mut self, id: &str, field: LineItemField) -> bool {
        let Some(index) = self.state.document_data.items.iter().position(|i| i.id == id) else {
            debug!(%id, "no line item to update");
            return false;
        };

        self.commit(|state| field.apply(&mut state.document_data.items[index]));
        true
    }

    /// Switch language; labels are re-resolved and local label edits dropped.
    pub fn set_locale(&mut self, locale: Locale) {
        self.commit(|state| {
            let doc = &mut state.document_data;
            state.locale = locale;
            doc.locale = locale;
            doc.template.labels = labels::resolve(locale, doc.document_type);
        });
    }

    /// Switch between invoice and purchase order. Resets the number and the labels.
    pub fn set_document_type(&mut self, document_type: DocumentType) {
        self.commit(|state| {
            let doc = &mut state.document_data;
            doc.document_type = document_type;
            doc.document_number = document_type.default_number().to_string();
            doc.template.labels = labels::resolve(doc.locale, document_type);
        });
    }

    pub fn set_template_type(&mut self, template_type: TemplateType) {
        self.commit(|state| {
            state.template_type = template_type;
            state.document_data.template.template_type = template_type;
        });
    }

    pub fn set_paper_size(&mut self, paper_size: PaperSize) {
        self.commit(|state| state.paper_size = paper_size);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.commit(|state| state.theme = theme);
    }

    pub fn set_show_settings(&mut self, show: bool) {
        self.show_settings = show;
        self.persist();
    }

    /// Discard the current document and start over.
    pub fn reset(&mut self, locale: Locale, today: NaiveDate) {
        self.commit(|state| *state = fresh_state(locale, today));
    }

    fn commit(&mut self, mutate: impl FnOnce(&mut PersistedState)) {
        let mut next = self.state.clone();
        mutate(&mut next);
        self.state = next;
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.state) {
            warn!(error = %e, "failed to persist document");
        }
    }
}

fn fresh_state(locale: Locale, today: NaiveDate) -> PersistedState {
    PersistedState {
        document_data: DocumentData::new(locale, today),
        locale,
        ..PersistedState::default()
    }
}
