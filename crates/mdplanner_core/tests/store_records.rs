use mdplanner_core::{
    CapacityPlan, FixedClock, Goal, Idea, Invoice, Note, Payment, ProjectStore, Quote,
    StoreError, StoreSettings, StrategicBuilder, StrategicLevel, TeamMember, TimeEntry,
    WeeklyAllocation,
};
use std::fs;
use tempfile::TempDir;

const NOW: &str = "2026-10-19T09:00:00.000Z";

fn open(dir: &TempDir) -> ProjectStore {
    let store =
        ProjectStore::new(StoreSettings::new(dir.path())).with_clock(FixedClock::new(NOW));
    store.create_project("Records").unwrap();
    store
}

#[test]
fn handwritten_goal_section_is_read() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let path = dir.path().join("records.md");

    let mut text = fs::read_to_string(&path).unwrap();
    text.push_str(
        "\n<!-- Goals -->\n# Goals\n\n\
         ## Launch MVP {type: project; kpi: Users > 100; start: 2026-01-01; end: 2026-06-01; status: active}\n\
         <!-- id: goal_1 -->\n\
         Description of the goal.\n",
    );
    fs::write(&path, text).unwrap();

    let goal = store.get::<Goal>("goal_1").unwrap();
    assert_eq!(goal.title, "Launch MVP");
    assert_eq!(goal.goal_type, "project");
    assert_eq!(goal.kpi, "Users > 100");
    assert_eq!(goal.start_date, "2026-01-01");
    assert_eq!(goal.end_date, "2026-06-01");
    assert_eq!(goal.status, "active");
    assert_eq!(goal.description, "Description of the goal.");
}

#[test]
fn generic_crud_uses_prefixed_ids() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    for title in ["One", "Two", "Three"] {
        store.create(Goal::new(title)).unwrap();
    }
    store.delete::<Goal>("goal_2").unwrap();
    assert_eq!(store.next_id::<Goal>().unwrap(), "goal_4");

    let created = store.create(Goal::new("Four")).unwrap();
    assert_eq!(created.id, "goal_4");
    let titles = store
        .read_all::<Goal>()
        .unwrap()
        .into_iter()
        .map(|g| g.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["One", "Three", "Four"]);

    let err = store.delete::<Goal>("goal_2").unwrap_err();
    assert_eq!(err.to_string(), "goal not found: goal_2");
}

#[test]
fn note_revisions_advance_and_created_is_kept() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    let note = store
        .create_note(Note::new("Standup", "  - indented\n\nsecond paragraph"))
        .unwrap();
    assert_eq!(note.revision, 1);
    assert_eq!(note.created_at, NOW);

    let updated = store
        .update_note(&note.id, Note::new("Standup", "rewritten"))
        .unwrap();
    assert_eq!(updated.revision, 2);
    assert_eq!(updated.created_at, NOW);

    let loaded = store.get::<Note>(&note.id).unwrap();
    assert_eq!(loaded.revision, 2);
    assert_eq!(loaded.content, "rewritten");
}

#[test]
fn ideas_expose_backlinks() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    let first = store.create_idea(Idea::new("Offline mode")).unwrap();
    assert_eq!(first.created, "2026-10-19");
    store
        .create_idea(Idea {
            links: vec![first.id.clone()],
            ..Idea::new("Sync engine")
        })
        .unwrap();

    let ideas = store.read_ideas_with_backlinks().unwrap();
    assert_eq!(ideas[0].backlinks, vec!["idea_2"]);
    assert!(ideas[1].backlinks.is_empty());
}

#[test]
fn capacity_members_and_allocations() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let plan = store.create(CapacityPlan::new("Q1")).unwrap();

    let member = store
        .add_team_member(&plan.id, TeamMember::new("Sam"))
        .unwrap();
    assert_eq!(member.id.len(), 8);

    let allocation = store
        .add_allocation(
            &plan.id,
            WeeklyAllocation {
                member_id: member.id.clone(),
                week_start: "2026-10-19".to_string(),
                allocated_hours: 24.0,
                ..WeeklyAllocation::default()
            },
        )
        .unwrap();

    store
        .update_team_member(
            &plan.id,
            &member.id,
            TeamMember {
                role: "Engineer".to_string(),
                ..TeamMember::new("Sam")
            },
        )
        .unwrap();

    let loaded = store.get::<CapacityPlan>(&plan.id).unwrap();
    assert_eq!(loaded.team_members[0].role, "Engineer");
    assert_eq!(loaded.allocations[0].allocated_hours, 24.0);

    store.delete_allocation(&plan.id, &allocation.id).unwrap();
    assert!(matches!(
        store.delete_allocation(&plan.id, &allocation.id).unwrap_err(),
        StoreError::NotFound { .. }
    ));
    assert!(matches!(
        store.add_team_member("missing", TeamMember::new("Ghost")).unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[test]
fn strategic_levels_renumber_on_delete() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let builder = store.create(StrategicBuilder::new("2027 plan")).unwrap();

    let vision = store
        .add_strategic_level(&builder.id, StrategicLevel::new("vision", "Be the default"))
        .unwrap();
    let mission = store
        .add_strategic_level(
            &builder.id,
            StrategicLevel {
                parent_id: vision.id.clone(),
                ..StrategicLevel::new("mission", "Ship weekly")
            },
        )
        .unwrap();
    assert_eq!(mission.order, 1);

    store.delete_strategic_level(&builder.id, &vision.id).unwrap();
    let loaded = store.get::<StrategicBuilder>(&builder.id).unwrap();
    assert_eq!(loaded.levels.len(), 1);
    assert_eq!(loaded.levels[0].order, 0);
    assert!(loaded.levels[0].parent_id.is_empty());
}

#[test]
fn quotes_and_invoices_get_numbers() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    assert_eq!(store.next_quote_number().unwrap(), "Q-0001");
    let quote = store.create_quote(Quote::default()).unwrap();
    assert_eq!(quote.number, "Q-0001");
    assert_eq!(quote.created, "2026-10-19");

    let edited = store
        .update_quote(
            &quote.id,
            Quote {
                title: "Website".to_string(),
                created: "1999-01-01".to_string(),
                ..quote.clone()
            },
        )
        .unwrap();
    assert_eq!(edited.created, "2026-10-19");
    assert_eq!(store.next_invoice_number().unwrap(), "INV-0001");
}

#[test]
fn payments_update_their_invoice() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let invoice = store
        .create_invoice(Invoice {
            total: 100.0,
            ..Invoice::default()
        })
        .unwrap();
    assert_eq!(invoice.number, "INV-0001");

    store
        .create_payment(Payment {
            invoice_id: invoice.id.clone(),
            amount: 40.0,
            ..Payment::default()
        })
        .unwrap();
    let partial = store.get::<Invoice>(&invoice.id).unwrap();
    assert_eq!(partial.status, "partial");
    assert_eq!(partial.paid_amount, 40.0);

    let payment = store
        .create_payment(Payment {
            invoice_id: invoice.id.clone(),
            amount: 60.0,
            ..Payment::default()
        })
        .unwrap();
    assert_eq!(payment.date, "2026-10-19");
    let paid = store.get::<Invoice>(&invoice.id).unwrap();
    assert_eq!(paid.status, "paid");
    assert_eq!(paid.paid_at, "2026-10-19");
    assert_eq!(store.read_all::<Payment>().unwrap().len(), 2);

    let err = store
        .create_payment(Payment {
            invoice_id: "nope".to_string(),
            amount: 1.0,
            ..Payment::default()
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(store.read_all::<Payment>().unwrap().len(), 2);
}

#[test]
fn time_entries_per_task() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    let entry = store
        .add_time_entry(
            "1",
            TimeEntry {
                hours: 2.5,
                person: "Sam".to_string(),
                description: "pairing".to_string(),
                ..TimeEntry::default()
            },
        )
        .unwrap();
    assert_eq!(entry.date, "2026-10-19");
    store
        .add_time_entry(
            "1",
            TimeEntry {
                hours: 1.0,
                ..TimeEntry::default()
            },
        )
        .unwrap();

    assert_eq!(store.time_entries_for_task("1").unwrap().len(), 2);
    assert_eq!(store.total_hours_for_task("1").unwrap(), 3.5);
    assert_eq!(store.total_hours_for_task("2").unwrap(), 0.0);

    store
        .update_time_entry(
            "1",
            &entry.id,
            TimeEntry {
                hours: 3.0,
                ..entry.clone()
            },
        )
        .unwrap();
    assert_eq!(store.total_hours_for_task("1").unwrap(), 4.0);

    let logs = store.read_time_entries().unwrap();
    for log in &logs {
        for e in log.entries.clone() {
            store.delete_time_entry(&log.task_id, &e.id).unwrap();
        }
    }
    assert!(store.read_time_entries().unwrap().is_empty());
    assert!(matches!(
        store.delete_time_entry("1", &entry.id).unwrap_err(),
        StoreError::NotFound { .. }
    ));
}
