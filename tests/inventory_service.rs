use playground_inventory::{
    Answers, Confirmation, EquipmentChanges, EquipmentDraft, EquipmentStore, InventoryError,
    InventoryService, Outcome, Prompter, Status, HOLDER_NONE,
};

/// Prompter stub that answers from fixed values and records what it was asked.
#[derive(Default)]
struct ScriptedPrompter {
    confirm: bool,
    holder: Option<String>,
    questions: Vec<Confirmation>,
    holder_requests: usize,
}

impl ScriptedPrompter {
    fn yes() -> Self {
        Self {
            confirm: true,
            ..Self::default()
        }
    }

    fn no() -> Self {
        Self::default()
    }

    fn holder(mut self, holder: &str) -> Self {
        self.holder = Some(holder.to_string());
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: Confirmation) -> bool {
        self.questions.push(question);
        self.confirm
    }

    fn holder_id(&mut self) -> Option<String> {
        self.holder_requests += 1;
        self.holder.clone()
    }
}

fn service() -> InventoryService {
    InventoryService::new(EquipmentStore::open_in_memory().unwrap())
}

fn draft(id: &str, category: &str, status: Status) -> EquipmentDraft {
    EquipmentDraft {
        name: format!("{category} #{id}"),
        id: id.to_string(),
        category: category.to_string(),
        status,
    }
}

fn add(service: &InventoryService, id: &str, category: &str, status: Status) {
    let mut prompter = ScriptedPrompter::yes().holder("S1");
    service
        .add(draft(id, category, status), &mut prompter)
        .unwrap();
}

#[test]
fn add_available_forces_na_holder_and_asks_confirmation() {
    let service = service();
    let mut prompter = ScriptedPrompter::yes().holder("ignored");

    let outcome = service
        .add(draft("F1", "Ball", Status::Available), &mut prompter)
        .unwrap();

    assert!(outcome.needs_refresh());
    assert_eq!(prompter.holder_requests, 0);
    assert_eq!(prompter.questions, vec![Confirmation::AddRecord]);

    let records = service.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].holder, HOLDER_NONE);
}

#[test]
fn add_in_use_keeps_the_supplied_holder() {
    let service = service();
    let mut prompter = ScriptedPrompter::yes().holder("  S123 ");

    service
        .add(draft("B1", "Bat", Status::InUse), &mut prompter)
        .unwrap();

    let stored = service.records().unwrap().remove(0);
    assert_eq!(stored.status, Status::InUse);
    assert_eq!(stored.holder, "S123");
}

#[test]
fn add_in_use_without_holder_is_a_validation_error() {
    let service = service();

    for mut prompter in [ScriptedPrompter::yes(), ScriptedPrompter::yes().holder("   ")] {
        let err = service
            .add(draft("B1", "Bat", Status::InUse), &mut prompter)
            .unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
        assert!(prompter.questions.is_empty(), "confirmation asked too early");
    }
    assert!(service.records().unwrap().is_empty());
}

#[test]
fn declined_add_writes_nothing() {
    let service = service();
    let mut prompter = ScriptedPrompter::no();

    let outcome = service
        .add(draft("F1", "Ball", Status::Available), &mut prompter)
        .unwrap();

    assert_eq!(outcome, Outcome::Declined);
    assert!(!outcome.needs_refresh());
    assert!(service.records().unwrap().is_empty());
}

#[test]
fn blank_id_or_name_is_rejected() {
    let service = service();
    let mut no_id = draft(" ", "Ball", Status::Available);
    let err = service.add(no_id.clone(), &mut Answers::confirmed()).unwrap_err();
    assert!(matches!(err, InventoryError::Validation(_)));

    no_id.id = "F1".into();
    no_id.name = String::new();
    let err = service.add(no_id, &mut Answers::confirmed()).unwrap_err();
    assert!(matches!(err, InventoryError::Validation(_)));
}

#[test]
fn ids_are_stored_as_typed() {
    let service = service();
    add(&service, "E1", "Ball", Status::Available);
    add(&service, " E1", "Bat", Status::Available);

    let ids: Vec<String> = service
        .records()
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, vec!["E1".to_string(), " E1".to_string()]);
}

#[test]
fn duplicate_id_surfaces_and_table_is_unchanged() {
    let service = service();
    add(&service, "F1", "Ball", Status::Available);

    let err = service
        .add(draft("F1", "Net", Status::InUse), &mut ScriptedPrompter::yes().holder("S9"))
        .unwrap_err();

    assert!(matches!(err, InventoryError::DuplicateKey(ref id) if id == "F1"));
    let records = service.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, "Ball");
}

#[test]
fn view_requires_a_selection_that_still_exists() {
    let service = service();
    add(&service, "F1", "Ball", Status::Available);
    let selected = service.records().unwrap().remove(0);

    assert!(matches!(service.view(None), Err(InventoryError::NotFound(_))));
    assert_eq!(service.view(Some(&selected)).unwrap(), selected);

    service.remove(Some(&selected)).unwrap();
    assert!(matches!(
        service.view(Some(&selected)),
        Err(InventoryError::NotFound(_))
    ));
}

#[test]
fn update_rewrites_fields_and_keeps_the_id() {
    let service = service();
    add(&service, "F1", "Ball", Status::Available);
    let selected = service.records().unwrap().remove(0);

    let changes = EquipmentChanges {
        name: "Size 5 football".into(),
        category: "Football".into(),
        status: Status::InUse,
    };
    let outcome = service
        .update(Some(&selected), changes, &mut ScriptedPrompter::no().holder("S42"))
        .unwrap();
    assert_eq!(outcome.focus_id(), Some("F1"));

    let stored = service.view(Some(&selected)).unwrap();
    assert_eq!(stored.id, "F1");
    assert_eq!(stored.name, "Size 5 football");
    assert_eq!(stored.category, "Football");
    assert_eq!(stored.status, Status::InUse);
    assert_eq!(stored.holder, "S42");

    let back = EquipmentChanges {
        status: Status::Available,
        ..EquipmentChanges::from(&stored)
    };
    service
        .update(Some(&stored), back, &mut ScriptedPrompter::no())
        .unwrap();
    assert_eq!(service.view(Some(&stored)).unwrap().holder, HOLDER_NONE);
}

#[test]
fn update_in_use_without_holder_leaves_record_alone() {
    let service = service();
    add(&service, "F1", "Ball", Status::Available);
    let selected = service.records().unwrap().remove(0);

    let changes = EquipmentChanges {
        status: Status::InUse,
        ..EquipmentChanges::from(&selected)
    };
    let err = service
        .update(Some(&selected), changes, &mut ScriptedPrompter::yes())
        .unwrap_err();

    assert!(matches!(err, InventoryError::Validation(_)));
    assert_eq!(service.view(Some(&selected)).unwrap(), selected);
}

#[test]
fn update_and_remove_of_vanished_record_are_not_found() {
    let service = service();
    add(&service, "F1", "Ball", Status::Available);
    let stale = service.records().unwrap().remove(0);
    service.remove(Some(&stale)).unwrap();

    let changes = EquipmentChanges::from(&stale);
    assert!(matches!(
        service.update(Some(&stale), changes, &mut ScriptedPrompter::no()),
        Err(InventoryError::NotFound(_))
    ));
    assert!(matches!(
        service.remove(Some(&stale)),
        Err(InventoryError::NotFound(_))
    ));
    assert!(matches!(service.remove(None), Err(InventoryError::NotFound(_))));
}

#[test]
fn clear_needs_confirmation() {
    let service = service();
    for id in ["A", "B", "C"] {
        add(&service, id, "Ball", Status::Available);
    }

    let mut prompter = ScriptedPrompter::no();
    assert_eq!(service.clear(&mut prompter).unwrap(), Outcome::Declined);
    assert_eq!(prompter.questions, vec![Confirmation::ClearAll]);
    assert_eq!(service.records().unwrap().len(), 3);

    assert_eq!(
        service.clear(&mut ScriptedPrompter::yes()).unwrap(),
        Outcome::Cleared(3)
    );
    assert!(service.records().unwrap().is_empty());
}

#[test]
fn toggle_available_issues_without_confirmation() {
    let service = service();
    add(&service, "F1", "Ball", Status::Available);
    let selected = service.records().unwrap().remove(0);

    let mut prompter = ScriptedPrompter::no().holder("S123");
    let outcome = service.toggle_status(Some(&selected), &mut prompter).unwrap();

    assert!(matches!(outcome, Outcome::Issued(ref e) if e.holder == "S123"));
    assert!(prompter.questions.is_empty());
    let stored = service.view(Some(&selected)).unwrap();
    assert_eq!(stored.status, Status::InUse);
    assert_eq!(stored.holder, "S123");
}

#[test]
fn toggle_available_without_holder_is_rejected() {
    let service = service();
    add(&service, "F1", "Ball", Status::Available);
    let selected = service.records().unwrap().remove(0);

    let err = service
        .toggle_status(Some(&selected), &mut ScriptedPrompter::yes())
        .unwrap_err();

    assert!(matches!(err, InventoryError::Validation(_)));
    assert_eq!(service.view(Some(&selected)).unwrap().status, Status::Available);
}

#[test]
fn toggle_in_use_returns_only_when_confirmed() {
    let service = service();
    add(&service, "B1", "Bat", Status::InUse);
    let selected = service.records().unwrap().remove(0);

    let mut declined = ScriptedPrompter::no();
    assert_eq!(
        service.toggle_status(Some(&selected), &mut declined).unwrap(),
        Outcome::Declined
    );
    assert_eq!(declined.questions, vec![Confirmation::ReturnEquipment]);
    assert_eq!(declined.holder_requests, 0);
    assert_eq!(service.view(Some(&selected)).unwrap().holder, "S1");

    service
        .toggle_status(Some(&selected), &mut ScriptedPrompter::yes())
        .unwrap();
    let stored = service.view(Some(&selected)).unwrap();
    assert_eq!(stored.status, Status::Available);
    assert_eq!(stored.holder, HOLDER_NONE);
}

#[test]
fn toggle_without_selection_is_not_found() {
    let service = service();
    assert!(matches!(
        service.toggle_status(None, &mut ScriptedPrompter::yes()),
        Err(InventoryError::NotFound(_))
    ));
}

#[test]
fn counts_match_the_example_inventory() {
    let service = service();
    add(&service, "A", "Ball", Status::Available);
    add(&service, "B", "Ball", Status::InUse);
    add(&service, "C", "Bat", Status::InUse);

    let report = service.report().unwrap();
    assert_eq!(report.categories.get("Ball"), Some(2));
    assert_eq!(report.categories.get("Bat"), Some(1));
    assert_eq!(report.statuses.get("Available"), Some(1));
    assert_eq!(report.statuses.get("In Use"), Some(2));
}

#[test]
fn report_of_empty_inventory_is_no_data() {
    let service = service();
    assert!(matches!(service.report(), Err(InventoryError::NoData)));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        service.export_report(dir.path(), chrono::Local::now()),
        Err(InventoryError::NoData)
    ));
}

#[test]
fn export_report_writes_a_timestamped_pdf() {
    let service = service();
    add(&service, "A", "Ballé", Status::Available);
    add(&service, "B", "Ballè", Status::InUse);

    let dir = tempfile::tempdir().unwrap();
    let path = service
        .export_report(dir.path(), chrono::Local::now())
        .unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("Playground_Report_") && name.ends_with(".pdf"));
    let text = String::from_utf8_lossy(&std::fs::read(&path).unwrap()).into_owned();
    assert!(text.contains("(Ball\\351) Tj"));
    assert!(text.contains("(Ball\\350) Tj"));
}
