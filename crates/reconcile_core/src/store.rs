//! Reconciliation store
//!
//! Owns the upload bundle, the last parse payload and the editable
//! collection. Public operations never return errors: failures end up as a
//! human-readable message in [`ReconciliationStore::error`], and prior
//! state is left as it was.
//!
//! Every operation that talks to the backend takes `&mut self`, so at most
//! one submission or export can be in flight on a store at a time.

use crate::collab::{SaveTarget, Transport};
use crate::draft::{Draft, DraftSnapshot};
use crate::error::StoreError;
use crate::normalizer::normalize;
use crate::slots::{SlotStore, DRAFT_SLOT};
use crate::stats::{self, Statistics};
use crate::types::{
    ComponentId, ComponentPatch, EditableComponent, ParseResponse, ParsedData, UploadBundle,
    UploadPatch, WireComponent,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct ReconciliationStore {
    transport: Arc<dyn Transport>,
    save_target: Arc<dyn SaveTarget>,
    slots: Arc<dyn SlotStore>,
    upload: UploadBundle,
    parse_result: Option<ParseResponse>,
    components: Vec<EditableComponent>,
    loading: bool,
    error: Option<String>,
    draft_timestamp: Option<i64>,
}

impl ReconciliationStore {
    pub fn new(
        transport: Arc<dyn Transport>,
        save_target: Arc<dyn SaveTarget>,
        slots: Arc<dyn SlotStore>,
    ) -> Self {
        Self {
            transport,
            save_target,
            slots,
            upload: UploadBundle::default(),
            parse_result: None,
            components: Vec::new(),
            loading: false,
            error: None,
            draft_timestamp: None,
        }
    }

    pub fn upload_bundle(&self) -> &UploadBundle {
        &self.upload
    }

    pub fn parse_result(&self) -> Option<&ParseResponse> {
        self.parse_result.as_ref()
    }

    pub fn components(&self) -> &[EditableComponent] {
        &self.components
    }

    pub fn find(&self, id: &ComponentId) -> Option<&EditableComponent> {
        self.components.iter().find(|c| &c.id == id)
    }

    pub fn selected_ids(&self) -> Vec<ComponentId> {
        self.components
            .iter()
            .filter(|c| c.is_selected)
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Timestamp (epoch millis) of the last restored draft
    pub fn draft_timestamp(&self) -> Option<i64> {
        self.draft_timestamp
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_components(&self.components)
    }

    pub fn technical_params(&self) -> BTreeMap<String, String> {
        stats::technical_params(self.parse_result.as_ref())
    }

    pub fn set_upload_bundle(&mut self, patch: UploadPatch) {
        self.upload.merge(patch);
    }

    /// Send the upload bundle to the backend and rebuild the collection
    ///
    /// Returns whether the collection was replaced.
    pub async fn submit_for_parsing(&mut self) -> bool {
        if !self.upload.is_complete() {
            self.fail(StoreError::MissingFiles);
            return false;
        }

        self.loading = true;
        self.error = None;
        let outcome = self.run_parse().await;
        self.loading = false;

        match outcome {
            Ok(count) => {
                info!(components = count, "drawing parsed");
                true
            }
            Err(err) => {
                error!(error = %err, "Parsing error");
                self.fail(err);
                false
            }
        }
    }

    async fn run_parse(&mut self) -> Result<usize, StoreError> {
        let (Some(pdf), Some(bom), Some(manager)) =
            (&self.upload.pdf, &self.upload.bom, &self.upload.manager)
        else {
            return Err(StoreError::MissingFiles);
        };

        let response = self
            .transport
            .parse(pdf, bom, manager, self.upload.bom_sheet_index)
            .await?;

        if !response.success {
            return Err(StoreError::rejected(response.error.as_deref()));
        }

        self.components = ingest(&response);
        self.parse_result = Some(response);
        Ok(self.components.len())
    }

    /// Merge `patch` into the record with identity `id`; unknown ids are ignored
    pub fn update_record(&mut self, id: &ComponentId, patch: ComponentPatch) {
        if let Some(component) = self.components.iter_mut().find(|c| &c.id == id) {
            patch.apply(component);
        }
    }

    /// Append a blank record opened for editing, returning its identity
    pub fn add_blank_record(&mut self) -> ComponentId {
        let component = EditableComponent::blank();
        let id = component.id.clone();
        self.components.push(component);
        id
    }

    pub fn delete_record(&mut self, id: &ComponentId) {
        self.components.retain(|c| &c.id != id);
    }

    /// Remove every selected record, returning how many were removed
    pub fn delete_selected(&mut self) -> usize {
        let before = self.components.len();
        self.components.retain(|c| !c.is_selected);
        before - self.components.len()
    }

    pub fn toggle_selected(&mut self, id: &ComponentId) {
        if let Some(component) = self.components.iter_mut().find(|c| &c.id == id) {
            component.is_selected = !component.is_selected;
        }
    }

    pub fn select_all(&mut self, selected: bool) {
        for component in &mut self.components {
            component.is_selected = selected;
        }
    }

    /// The last parse payload with its component table replaced by the
    /// current collection, stripped of identity and UI flags
    pub fn export_payload(&self) -> Option<ParseResponse> {
        let parse_result = self.parse_result.as_ref()?;
        let mut payload = parse_result.clone();
        let data = payload.data.get_or_insert_with(ParsedData::default);
        data.table2 = self
            .components
            .iter()
            .map(|c| WireComponent::Current(c.component.clone()))
            .collect();
        Some(payload)
    }

    /// Export the current state to a spreadsheet and save it
    ///
    /// Returns where the file was saved.
    pub async fn export_current_state(&mut self) -> Option<PathBuf> {
        let Some(payload) = self.export_payload() else {
            self.fail(StoreError::NothingToExport);
            return None;
        };

        self.loading = true;
        self.error = None;
        let outcome = self.run_export(&payload).await;
        self.loading = false;

        match outcome {
            Ok(path) => {
                info!(path = %path.display(), "exported spreadsheet");
                Some(path)
            }
            Err(err) => {
                error!(error = %err, "Export error");
                self.fail(err);
                None
            }
        }
    }

    async fn run_export(&self, payload: &ParseResponse) -> Result<PathBuf, StoreError> {
        let blob = self.transport.export(payload).await?;
        let filename = format!(
            "parsing_result_{}.xlsx",
            chrono::Utc::now().timestamp_millis()
        );
        Ok(self.save_target.save(&blob, &filename)?)
    }

    /// Save the parse payload and collection to the draft slot
    pub fn persist_draft(&mut self) -> bool {
        let snapshot = DraftSnapshot {
            parse_result: self.parse_result.as_ref(),
            editable_components: &self.components,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        let result = snapshot
            .to_json()
            .map_err(StoreError::from)
            .and_then(|json| Ok(self.slots.set(DRAFT_SLOT, &json)?));

        match result {
            Ok(()) => {
                debug!(components = self.components.len(), "draft saved");
                true
            }
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    /// Replace the parse payload and collection with the saved draft
    ///
    /// Returns whether a draft was found and loaded.
    pub fn restore_draft(&mut self) -> bool {
        let draft = match self.read_draft() {
            Ok(Some(draft)) => draft,
            Ok(None) => return false,
            Err(err) => {
                self.fail(err);
                return false;
            }
        };

        debug!(
            components = draft.editable_components.len(),
            timestamp = draft.timestamp,
            "draft restored"
        );
        self.parse_result = draft.parse_result;
        self.components = draft.editable_components;
        self.draft_timestamp = Some(draft.timestamp);
        true
    }

    fn read_draft(&self) -> Result<Option<Draft>, StoreError> {
        match self.slots.get(DRAFT_SLOT)? {
            Some(json) => Ok(Some(Draft::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Drop the saved draft, if any
    pub fn discard_draft(&mut self) -> bool {
        match self.slots.remove(DRAFT_SLOT) {
            Ok(()) => true,
            Err(err) => {
                self.fail(err.into());
                false
            }
        }
    }

    pub fn reset_all(&mut self) {
        self.upload = UploadBundle::default();
        self.parse_result = None;
        self.components.clear();
        self.error = None;
        self.loading = false;
        self.draft_timestamp = None;
    }

    fn fail(&mut self, err: StoreError) {
        self.error = Some(err.to_string());
    }
}

/// Normalize every record of the payload and give it a fresh identity
fn ingest(response: &ParseResponse) -> Vec<EditableComponent> {
    response
        .data
        .as_ref()
        .map(|data| {
            data.table2
                .iter()
                .cloned()
                .enumerate()
                .map(|(index, record)| EditableComponent::ingested(index, normalize(record)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::DirectorySaveTarget;
    use crate::slots::MemorySlots;
    use crate::types::{Component, Status, Table1Field, UploadFile};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted backend that records what it was asked
    #[derive(Default)]
    struct FakeTransport {
        parse_reply: Mutex<Option<anyhow::Result<ParseResponse>>>,
        export_reply: Mutex<Option<anyhow::Result<Vec<u8>>>>,
        parse_calls: AtomicUsize,
        exported: Mutex<Vec<ParseResponse>>,
    }

    impl FakeTransport {
        fn replying(response: ParseResponse) -> Self {
            let fake = Self::default();
            *fake.parse_reply.lock().unwrap() = Some(Ok(response));
            *fake.export_reply.lock().unwrap() = Some(Ok(b"xlsx".to_vec()));
            fake
        }

        fn failing(message: &str) -> Self {
            let fake = Self::default();
            *fake.parse_reply.lock().unwrap() = Some(Err(anyhow::anyhow!(message.to_string())));
            *fake.export_reply.lock().unwrap() = Some(Err(anyhow::anyhow!(message.to_string())));
            fake
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn parse(
            &self,
            _pdf: &UploadFile,
            _bom: &UploadFile,
            _manager: &UploadFile,
            _bom_sheet_index: u32,
        ) -> anyhow::Result<ParseResponse> {
            self.parse_calls.fetch_add(1, Ordering::SeqCst);
            self.parse_reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply")))
        }

        async fn export(&self, payload: &ParseResponse) -> anyhow::Result<Vec<u8>> {
            self.exported.lock().unwrap().push(payload.clone());
            self.export_reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply")))
        }
    }

    struct Harness {
        store: ReconciliationStore,
        transport: Arc<FakeTransport>,
        slots: Arc<MemorySlots>,
        _out: tempfile::TempDir,
    }

    fn harness(transport: FakeTransport) -> Harness {
        let transport = Arc::new(transport);
        let slots = Arc::new(MemorySlots::new());
        let out = tempfile::tempdir().unwrap();
        let store = ReconciliationStore::new(
            transport.clone(),
            Arc::new(DirectorySaveTarget::new(out.path())),
            slots.clone(),
        );
        Harness {
            store,
            transport,
            slots,
            _out: out,
        }
    }

    fn full_bundle() -> UploadPatch {
        UploadPatch {
            pdf: Some(UploadFile::new("drawing.pdf", b"%PDF".to_vec())),
            bom: Some(UploadFile::new("bom.xlsx", vec![0x50, 0x4b])),
            manager: Some(UploadFile::new("order.xlsx", vec![0x50, 0x4b])),
            bom_sheet_index: Some(1),
        }
    }

    fn sample_response() -> ParseResponse {
        serde_json::from_value(json!({
            "success": true,
            "data": {
                "table1": [{"field": "DESIGN_PRESSURE", "value": "51 bar"}],
                "table2": [
                    {"pos": "1", "description": "Body", "material": "A105",
                     "bom_material": "A105", "order_material": "A105",
                     "quantity": 1, "manager_quantity": 1, "status": "equal"},
                    {"pos": "2", "description": "Bolt",
                     "material": {"value": "M8", "isEqual": true, "new_item": false},
                     "quantity": {"value": 10, "from_bom": true}},
                    {"pos": "3", "description": "Seat", "material": "PTFE", "status": "notEqual"}
                ],
                "table3": [{"DRAWING_NO": "VLV-100"}]
            },
            "validation": {"bom_valid": true, "bom_sheet": 1, "bom_components": 3,
                           "manager_found": true, "bom_validation": {"valid": true, "errors": []}}
        }))
        .unwrap()
    }

    async fn parsed_store() -> Harness {
        let mut h = harness(FakeTransport::replying(sample_response()));
        h.store.set_upload_bundle(full_bundle());
        assert!(h.store.submit_for_parsing().await);
        h
    }

    #[tokio::test]
    async fn test_submit_builds_collection_in_payload_order() {
        let h = parsed_store().await;

        let components = h.store.components();
        assert_eq!(components.len(), 3);
        assert_eq!(components[0].component.description, "Body");
        assert_eq!(components[1].component.description, "Bolt");
        assert_eq!(components[2].component.description, "Seat");
        assert!(components.iter().all(|c| !c.is_editing && !c.is_selected));
        assert!(!h.store.is_loading());
        assert_eq!(h.store.error(), None);
        assert!(h.store.parse_result().is_some());
    }

    #[tokio::test]
    async fn test_submit_normalizes_legacy_record() {
        let h = parsed_store().await;

        let bolt = &h.store.components()[1];
        assert!(bolt.id.as_str().starts_with("comp-1-"));
        assert_eq!(bolt.component.material, "M8");
        assert_eq!(bolt.component.status, Status::Equal);
        assert_eq!(bolt.component.quantity, Some(10.0));
        assert_eq!(bolt.component.manager_quantity, None);
        assert_eq!(bolt.component.bom_material, None);
        assert_eq!(bolt.component.order_material, None);
        assert!(!bolt.is_editing);
        assert!(!bolt.is_selected);
    }

    #[tokio::test]
    async fn test_identities_are_unique() {
        let h = parsed_store().await;
        let mut ids: Vec<_> = h.store.components().iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn test_submit_without_manager_file() {
        let mut h = harness(FakeTransport::replying(sample_response()));
        h.store.set_upload_bundle(UploadPatch {
            manager: None,
            ..full_bundle()
        });

        assert!(!h.store.submit_for_parsing().await);

        assert_eq!(h.store.error(), Some("Please upload all required files"));
        assert!(h.store.components().is_empty());
        assert_eq!(h.transport.parse_calls.load(Ordering::SeqCst), 0);
        assert!(!h.store.is_loading());
    }

    #[tokio::test]
    async fn test_logical_failure_keeps_collection() {
        let mut h = parsed_store().await;
        let before = h.store.components().to_vec();

        *h.transport.parse_reply.lock().unwrap() = Some(Ok(ParseResponse {
            success: false,
            error: Some("bad sheet index".to_string()),
            ..ParseResponse::default()
        }));
        assert!(!h.store.submit_for_parsing().await);

        assert_eq!(h.store.error(), Some("bad sheet index"));
        assert_eq!(h.store.components(), before.as_slice());
        assert!(!h.store.is_loading());
    }

    #[tokio::test]
    async fn test_logical_failure_without_text_uses_fallback() {
        let mut h = harness(FakeTransport::replying(ParseResponse::default()));
        h.store.set_upload_bundle(full_bundle());

        assert!(!h.store.submit_for_parsing().await);
        assert_eq!(h.store.error(), Some("Parsing failed"));
        assert!(h.store.parse_result().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_is_surfaced() {
        let mut h = harness(FakeTransport::failing("HTTP error! status: 502"));
        h.store.set_upload_bundle(full_bundle());

        assert!(!h.store.submit_for_parsing().await);
        assert_eq!(h.store.error(), Some("HTTP error! status: 502"));
        assert!(h.store.components().is_empty());
        assert!(!h.store.is_loading());
    }

    #[tokio::test]
    async fn test_success_without_data_yields_empty_collection() {
        let mut h = harness(FakeTransport::replying(ParseResponse {
            success: true,
            ..ParseResponse::default()
        }));
        h.store.set_upload_bundle(full_bundle());

        assert!(h.store.submit_for_parsing().await);
        assert!(h.store.components().is_empty());
    }

    #[tokio::test]
    async fn test_update_record_merges_fields() {
        let mut h = parsed_store().await;
        let id = h.store.components()[2].id.clone();

        h.store.update_record(
            &id,
            ComponentPatch {
                material: Some("RPTFE".to_string()),
                status: Some(Status::Equal),
                ..ComponentPatch::default()
            },
        );

        let seat = h.store.find(&id).unwrap();
        assert_eq!(seat.id, id);
        assert_eq!(seat.component.material, "RPTFE");
        assert_eq!(seat.component.status, Status::Equal);
        assert_eq!(seat.component.description, "Seat");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let mut h = parsed_store().await;
        let before = serde_json::to_string(h.store.components()).unwrap();

        h.store.update_record(
            &ComponentId::from("comp-missing"),
            ComponentPatch {
                description: Some("changed".to_string()),
                ..ComponentPatch::default()
            },
        );

        assert_eq!(serde_json::to_string(h.store.components()).unwrap(), before);
    }

    #[test]
    fn test_add_blank_record() {
        let mut h = harness(FakeTransport::default());
        let id = h.store.add_blank_record();

        let added = h.store.components().last().unwrap();
        assert_eq!(added.id, id);
        assert_eq!(added.component.status, Status::New);
        assert_eq!(added.component.description, "");
        assert_eq!(added.component.material, "");
        assert_eq!(added.component.quantity, None);
        assert!(added.is_editing);
        assert!(!added.is_selected);
    }

    #[tokio::test]
    async fn test_delete_and_selection() {
        let mut h = parsed_store().await;
        let ids: Vec<_> = h.store.components().iter().map(|c| c.id.clone()).collect();

        h.store.toggle_selected(&ids[0]);
        h.store.toggle_selected(&ids[2]);
        h.store.toggle_selected(&ids[2]);
        assert_eq!(h.store.selected_ids(), vec![ids[0].clone()]);

        assert_eq!(h.store.delete_selected(), 1);
        assert_eq!(h.store.components().len(), 2);
        assert_eq!(h.store.components()[0].id, ids[1]);

        h.store.delete_record(&ids[2]);
        h.store.delete_record(&ComponentId::from("comp-missing"));
        assert_eq!(h.store.components().len(), 1);
        assert_eq!(h.store.components()[0].id, ids[1]);
    }

    #[tokio::test]
    async fn test_select_all_then_delete_selected_empties() {
        let mut h = parsed_store().await;
        h.store.add_blank_record();

        h.store.delete_selected();
        h.store.select_all(true);
        h.store.delete_selected();

        assert!(h.store.components().is_empty());
        assert_eq!(h.store.statistics(), Statistics::default());
    }

    #[tokio::test]
    async fn test_statistics_track_edits() {
        let mut h = parsed_store().await;
        let stats = h.store.statistics();
        assert_eq!((stats.total, stats.equal, stats.not_equal, stats.new_items), (3, 2, 1, 0));

        let id = h.store.components()[0].id.clone();
        h.store.update_record(
            &id,
            ComponentPatch {
                status: Some(Status::NotEqual),
                ..ComponentPatch::default()
            },
        );
        h.store.add_blank_record();

        let stats = h.store.statistics();
        assert_eq!((stats.total, stats.equal, stats.not_equal, stats.new_items), (4, 1, 2, 1));
        assert_eq!(stats.equal + stats.not_equal + stats.new_items, stats.total);
    }

    #[tokio::test]
    async fn test_technical_params_follow_payload() {
        let mut h = parsed_store().await;
        assert_eq!(h.store.technical_params()["DESIGN_PRESSURE"], "51 bar");

        h.store.reset_all();
        assert!(h.store.technical_params().is_empty());
    }

    #[tokio::test]
    async fn test_export_reflects_edits() {
        let mut h = parsed_store().await;
        let first = h.store.components()[0].id.clone();
        h.store.add_blank_record();
        h.store.delete_record(&first);

        let path = h.store.export_current_state().await.unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("parsing_result_") && name.ends_with(".xlsx"));

        let exported = h.transport.exported.lock().unwrap()[0].clone();
        let value = serde_json::to_value(&exported).unwrap();
        let table2 = value["data"]["table2"].as_array().unwrap();
        assert_eq!(table2.len(), 3);
        for record in table2 {
            assert!(record.get("id").is_none());
            assert!(record.get("isEditing").is_none());
            assert!(record.get("isSelected").is_none());
        }
        assert_eq!(table2[0]["description"], "Bolt");
        assert_eq!(table2[0]["material"], "M8");
        assert_eq!(table2[2]["status"], "new");
        assert_eq!(value["data"]["table1"][0]["field"], "DESIGN_PRESSURE");
        assert_eq!(value["data"]["table3"][0]["DRAWING_NO"], "VLV-100");
        assert!(!h.store.is_loading());
    }

    #[tokio::test]
    async fn test_export_without_payload() {
        let mut h = harness(FakeTransport::replying(sample_response()));
        h.store.add_blank_record();

        assert_eq!(h.store.export_current_state().await, None);
        assert_eq!(h.store.error(), Some("No data to export"));
        assert!(h.transport.exported.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_failure_is_surfaced() {
        let mut h = parsed_store().await;
        *h.transport.export_reply.lock().unwrap() =
            Some(Err(anyhow::anyhow!("HTTP error! status: 500")));
        let before = h.store.components().to_vec();

        assert_eq!(h.store.export_current_state().await, None);
        assert_eq!(h.store.error(), Some("HTTP error! status: 500"));
        assert_eq!(h.store.components(), before.as_slice());
        assert!(!h.store.is_loading());
    }

    #[tokio::test]
    async fn test_draft_roundtrip() {
        let mut h = parsed_store().await;
        let id = h.store.components()[1].id.clone();
        h.store.toggle_selected(&id);
        assert!(h.store.persist_draft());

        let mut restored = ReconciliationStore::new(
            Arc::new(FakeTransport::default()),
            Arc::new(DirectorySaveTarget::new(h._out.path())),
            h.slots.clone(),
        );
        assert!(restored.restore_draft());

        assert_eq!(restored.components(), h.store.components());
        assert_eq!(restored.parse_result(), h.store.parse_result());
        assert!(restored.find(&id).unwrap().is_selected);
        assert!(restored.draft_timestamp().is_some());
    }

    #[test]
    fn test_restore_without_draft() {
        let mut h = harness(FakeTransport::default());
        assert!(!h.store.restore_draft());
        assert_eq!(h.store.error(), None);
    }

    #[test]
    fn test_restore_corrupt_draft_sets_error() {
        let mut h = harness(FakeTransport::default());
        h.slots.set(DRAFT_SLOT, "{not json").unwrap();

        assert!(!h.store.restore_draft());
        assert!(h.store.error().unwrap().starts_with("Draft is not valid JSON"));
    }

    #[test]
    fn test_restore_keeps_records_around_an_off_type_one() {
        let mut h = harness(FakeTransport::default());
        h.slots
            .set(
                DRAFT_SLOT,
                r#"{"parseResult": {"success": true, "data": {"table2": [
                        {"description": "Stud", "material": {"value": "B7", "isEqual": "yes"}}]}},
                    "editableComponents": [
                        {"id": "comp-0-a", "description": "Body", "material": "A105", "status": "equal"},
                        {"id": "comp-1-b", "description": "Nut", "material": null, "status": "partial"},
                        {"id": "comp-2-c", "pos": 3, "description": "Seat", "material": "PTFE", "status": "notEqual"}
                    ],
                    "timestamp": 5}"#,
            )
            .unwrap();

        assert!(h.store.restore_draft());
        assert_eq!(h.store.error(), None);
        assert_eq!(h.store.components().len(), 3);
        assert_eq!(
            h.store.statistics(),
            Statistics {
                total: 3,
                equal: 1,
                not_equal: 1,
                new_items: 1,
            }
        );
        let seat = h.store.find(&ComponentId::from("comp-2-c")).unwrap();
        assert_eq!(seat.component.pos.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_restore_replaces_wholesale() {
        let mut h = parsed_store().await;
        h.slots
            .set(
                DRAFT_SLOT,
                r#"{"parseResult": null, "editableComponents": [], "timestamp": 1}"#,
            )
            .unwrap();

        assert!(h.store.restore_draft());
        assert!(h.store.components().is_empty());
        assert!(h.store.parse_result().is_none());
        assert_eq!(h.store.draft_timestamp(), Some(1));
    }

    #[tokio::test]
    async fn test_discard_draft() {
        let mut h = parsed_store().await;
        assert!(h.store.persist_draft());
        assert!(h.store.discard_draft());
        assert!(!h.store.restore_draft());
    }

    #[tokio::test]
    async fn test_reset_all() {
        let mut h = parsed_store().await;
        h.store.set_upload_bundle(UploadPatch {
            bom_sheet_index: Some(5),
            ..UploadPatch::default()
        });

        h.store.reset_all();

        assert_eq!(h.store.upload_bundle(), &UploadBundle::default());
        assert!(h.store.parse_result().is_none());
        assert!(h.store.components().is_empty());
        assert_eq!(h.store.error(), None);
        assert!(!h.store.is_loading());
    }

    #[test]
    fn test_export_payload_keeps_current_records() {
        let mut h = harness(FakeTransport::default());
        h.store.parse_result = Some(ParseResponse {
            success: true,
            data: Some(ParsedData {
                table1: vec![Table1Field {
                    field: "DN".to_string(),
                    value: "50".to_string(),
                }],
                ..ParsedData::default()
            }),
            ..ParseResponse::default()
        });
        h.store.components = vec![EditableComponent::ingested(
            0,
            Component {
                description: "Disc".to_string(),
                ..Component::default()
            },
        )];

        let payload = h.store.export_payload().unwrap();
        let data = payload.data.unwrap();
        assert_eq!(data.table1.len(), 1);
        assert_eq!(
            data.table2,
            vec![WireComponent::Current(Component {
                description: "Disc".to_string(),
                ..Component::default()
            })]
        );
    }
}
