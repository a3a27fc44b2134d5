use chrono::{DateTime, TimeZone, Utc};

use carebridge::data::donations::{self, DonationPatch, NewDonation};
use carebridge::data::issues::{self, IssuePatch, NewIssue};
use carebridge::data::orphanages::{self, NewOrphanage, OrphanagePatch};
use carebridge::data::success_stories::{self, StoryFilter};
use carebridge::jobs::{
    generate_success_stories, story_id_for_issue, sync_success_stories, SkipReason, SyncOutcome,
};
use carebridge::models::{
    Donation, Issue, IssueCategory, IssueStatus, Orphanage, Priority, SuccessStory,
};
use carebridge::store::MemoryStore;

fn day(year: i32, month: u32, date: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, date, 0, 0, 0).unwrap()
}

async fn seed_orphanage(store: &MemoryStore, name: &str, children_count: u32) -> Orphanage {
    orphanages::create_orphanage(
        store,
        NewOrphanage {
            name: name.to_string(),
            city: "Nairobi".to_string(),
            country: "Kenya".to_string(),
            address: None,
            children_count,
            staff_count: 6,
            contact_email: format!("{}@example.org", name.to_lowercase().replace(' ', ".")),
            contact_phone: None,
            images: vec![],
        },
    )
    .await
    .unwrap()
}

async fn seed_resolved_issue(
    store: &MemoryStore,
    orphanage_id: &str,
    title: &str,
    estimated_cost: f64,
    resolved_at: DateTime<Utc>,
) -> Issue {
    let issue = issues::create_issue(
        store,
        NewIssue {
            orphanage_id: orphanage_id.to_string(),
            title: title.to_string(),
            description: "Roof repairs before the rainy season".to_string(),
            category: IssueCategory::Shelter,
            priority: Priority::High,
            estimated_cost,
            deadline: None,
            images: vec![],
        },
    )
    .await
    .unwrap();

    issues::update_issue(
        store,
        &issue.id,
        IssuePatch {
            status: Some(IssueStatus::Resolved),
            resolved_at: Some(resolved_at),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

async fn seed_completed_donation(store: &MemoryStore, issue_id: &str, amount: f64) -> Donation {
    let donation = donations::create_donation(
        store,
        NewDonation {
            donor_id: Some("donor-1".to_string()),
            anonymous: false,
            amount,
            currency: "USD".to_string(),
            message: None,
            issue_id: Some(issue_id.to_string()),
        },
    )
    .await
    .unwrap();

    donations::update_donation(
        store,
        &donation.id,
        DonationPatch {
            status: Some(carebridge::models::DonationStatus::Completed),
        },
    )
    .await
    .unwrap()
}

async fn stories_for_issue(store: &MemoryStore, issue_id: &str) -> Vec<SuccessStory> {
    success_stories::list_success_stories(
        store,
        StoryFilter {
            issue_id: Some(issue_id.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn fully_funded_resolved_issue_produces_one_story() {
    let store = MemoryStore::new();
    let orphanage = seed_orphanage(&store, "Sunrise Home", 40).await;
    let issue =
        seed_resolved_issue(&store, &orphanage.id, "New roof", 500.0, day(2024, 1, 15)).await;
    seed_completed_donation(&store, &issue.id, 300.0).await;
    seed_completed_donation(&store, &issue.id, 250.0).await;

    let outcomes = generate_success_stories(&store).await.unwrap();
    assert_eq!(outcomes.len(), 1);
    let story = match &outcomes[0] {
        SyncOutcome::Created(story) => story,
        other => panic!("expected Created, got {:?}", other),
    };

    assert_eq!(story.id, story_id_for_issue(&issue.id));
    assert_eq!(story.issue_id.as_deref(), Some(issue.id.as_str()));
    assert_eq!(story.issue_title.as_deref(), Some("New roof"));
    assert_eq!(story.orphanage_id, orphanage.id);
    assert_eq!(story.orphanage_name, "Sunrise Home");
    assert_eq!(story.title, "Successfully funded: New roof");
    assert_eq!(story.cost, 550.0);
    assert_eq!(story.beneficiaries, 40);
    assert_eq!(story.completed_at, day(2024, 1, 15));

    let stored = stories_for_issue(&store, &issue.id).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].cost, 550.0);
}

#[tokio::test]
async fn funding_threshold_is_inclusive() {
    let store = MemoryStore::new();
    let orphanage = seed_orphanage(&store, "Hilltop Home", 25).await;
    let issue =
        seed_resolved_issue(&store, &orphanage.id, "School books", 1000.0, day(2024, 3, 1)).await;
    seed_completed_donation(&store, &issue.id, 999.0).await;

    // 999 of 1000: no story.
    let outcomes = generate_success_stories(&store).await.unwrap();
    assert_eq!(outcomes.len(), 1);
    match &outcomes[0] {
        SyncOutcome::Skipped {
            issue_id,
            reason: SkipReason::Underfunded { raised, estimated },
        } => {
            assert_eq!(issue_id, &issue.id);
            assert_eq!(*raised, 999.0);
            assert_eq!(*estimated, 1000.0);
        }
        other => panic!("expected Skipped/Underfunded, got {:?}", other),
    }
    assert!(stories_for_issue(&store, &issue.id).await.is_empty());

    // Exactly 1000: one story.
    seed_completed_donation(&store, &issue.id, 1.0).await;
    let outcomes = generate_success_stories(&store).await.unwrap();
    assert!(matches!(&outcomes[0], SyncOutcome::Created(story) if story.cost == 1000.0));
    assert_eq!(stories_for_issue(&store, &issue.id).await.len(), 1);
}

#[tokio::test]
async fn pending_and_failed_donations_are_excluded_from_the_total() {
    let store = MemoryStore::new();
    let orphanage = seed_orphanage(&store, "Lakeside Home", 18).await;
    let issue =
        seed_resolved_issue(&store, &orphanage.id, "Winter clothes", 500.0, day(2024, 2, 1)).await;

    // Pending donation: never completed.
    donations::create_donation(
        &store,
        NewDonation {
            donor_id: None,
            anonymous: true,
            amount: 500.0,
            currency: "USD".to_string(),
            message: None,
            issue_id: Some(issue.id.clone()),
        },
    )
    .await
    .unwrap();

    // Failed donation.
    let failed = seed_completed_donation(&store, &issue.id, 500.0).await;
    donations::update_donation(
        &store,
        &failed.id,
        DonationPatch {
            status: Some(carebridge::models::DonationStatus::Failed),
        },
    )
    .await
    .unwrap();

    let outcomes = generate_success_stories(&store).await.unwrap();
    assert!(matches!(
        &outcomes[0],
        SyncOutcome::Skipped {
            reason: SkipReason::Underfunded { raised, .. },
            ..
        } if *raised == 0.0
    ));

    seed_completed_donation(&store, &issue.id, 500.0).await;
    let outcomes = generate_success_stories(&store).await.unwrap();
    assert!(matches!(&outcomes[0], SyncOutcome::Created(story) if story.cost == 500.0));
}

#[tokio::test]
async fn second_run_updates_instead_of_inserting() {
    let store = MemoryStore::new();
    let orphanage = seed_orphanage(&store, "Sunrise Home", 40).await;
    let issue =
        seed_resolved_issue(&store, &orphanage.id, "New roof", 500.0, day(2024, 1, 15)).await;
    seed_completed_donation(&store, &issue.id, 550.0).await;

    let first = generate_success_stories(&store).await.unwrap();
    assert!(matches!(&first[0], SyncOutcome::Created(_)));

    let second = generate_success_stories(&store).await.unwrap();
    assert!(matches!(&second[0], SyncOutcome::Updated(_)));

    assert_eq!(stories_for_issue(&store, &issue.id).await.len(), 1);
}

#[tokio::test]
async fn rerun_after_new_donation_refreshes_cost_only() {
    let store = MemoryStore::new();
    let orphanage = seed_orphanage(&store, "Sunrise Home", 40).await;
    let issue =
        seed_resolved_issue(&store, &orphanage.id, "New roof", 500.0, day(2024, 1, 15)).await;
    seed_completed_donation(&store, &issue.id, 300.0).await;
    seed_completed_donation(&store, &issue.id, 250.0).await;

    let first = generate_success_stories(&store).await.unwrap();
    let original = match &first[0] {
        SyncOutcome::Created(story) => story.clone(),
        other => panic!("expected Created, got {:?}", other),
    };

    // A third donation completes after the story was generated.
    seed_completed_donation(&store, &issue.id, 100.0).await;

    let second = generate_success_stories(&store).await.unwrap();
    let refreshed = match &second[0] {
        SyncOutcome::Updated(story) => story.clone(),
        other => panic!("expected Updated, got {:?}", other),
    };

    assert_eq!(refreshed.id, original.id);
    assert_eq!(refreshed.cost, 650.0);
    assert_eq!(refreshed.completed_at, day(2024, 1, 15));
    // Narrative fields keep their published form.
    assert_eq!(refreshed.title, original.title);
    assert_eq!(refreshed.description, original.description);
    assert_eq!(refreshed.impact, original.impact);
    assert_eq!(refreshed.beneficiaries, original.beneficiaries);

    assert_eq!(stories_for_issue(&store, &issue.id).await.len(), 1);
}

#[tokio::test]
async fn missing_orphanage_is_skipped_without_error() {
    let store = MemoryStore::new();
    let issue =
        seed_resolved_issue(&store, "gone-orphanage", "New beds", 100.0, day(2024, 4, 1)).await;
    seed_completed_donation(&store, &issue.id, 100.0).await;

    let outcomes = generate_success_stories(&store).await.unwrap();
    assert_eq!(outcomes.len(), 1);
    match &outcomes[0] {
        SyncOutcome::Skipped {
            issue_id,
            reason: SkipReason::OrphanageMissing { orphanage_id },
        } => {
            assert_eq!(issue_id, &issue.id);
            assert_eq!(orphanage_id, "gone-orphanage");
        }
        other => panic!("expected Skipped/OrphanageMissing, got {:?}", other),
    }
    assert!(stories_for_issue(&store, &issue.id).await.is_empty());
}

#[tokio::test]
async fn beneficiaries_reflect_children_count_at_generation_time() {
    let store = MemoryStore::new();
    let orphanage = seed_orphanage(&store, "Sunrise Home", 40).await;

    let first_issue =
        seed_resolved_issue(&store, &orphanage.id, "New roof", 100.0, day(2024, 1, 15)).await;
    seed_completed_donation(&store, &first_issue.id, 100.0).await;
    generate_success_stories(&store).await.unwrap();

    // The home grows, then resolves a second issue.
    orphanages::update_orphanage(
        &store,
        &orphanage.id,
        OrphanagePatch {
            children_count: Some(55),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let second_issue =
        seed_resolved_issue(&store, &orphanage.id, "New van", 200.0, day(2024, 5, 20)).await;
    seed_completed_donation(&store, &second_issue.id, 200.0).await;
    generate_success_stories(&store).await.unwrap();

    let first_story = &stories_for_issue(&store, &first_issue.id).await[0];
    let second_story = &stories_for_issue(&store, &second_issue.id).await[0];
    assert_eq!(first_story.beneficiaries, 40);
    assert_eq!(second_story.beneficiaries, 55);
}

#[tokio::test]
async fn sync_report_tallies_outcomes_directly() {
    let store = MemoryStore::new();
    let orphanage = seed_orphanage(&store, "Sunrise Home", 40).await;

    // Two fundable issues, one underfunded, one orphanless.
    let funded_a =
        seed_resolved_issue(&store, &orphanage.id, "New roof", 100.0, day(2024, 1, 1)).await;
    seed_completed_donation(&store, &funded_a.id, 100.0).await;
    let funded_b =
        seed_resolved_issue(&store, &orphanage.id, "New van", 200.0, day(2024, 2, 1)).await;
    seed_completed_donation(&store, &funded_b.id, 250.0).await;
    seed_resolved_issue(&store, &orphanage.id, "Textbooks", 300.0, day(2024, 3, 1)).await;
    let orphanless =
        seed_resolved_issue(&store, "gone", "New beds", 50.0, day(2024, 4, 1)).await;
    seed_completed_donation(&store, &orphanless.id, 50.0).await;

    let report = sync_success_stories(&store).await.unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(report.updated, 0);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.total, 2);

    // Idempotent: the second pass updates both stories.
    let report = sync_success_stories(&store).await.unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 2);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.total, 2);
}

#[tokio::test]
async fn open_and_closed_issues_are_ignored() {
    let store = MemoryStore::new();
    let orphanage = seed_orphanage(&store, "Sunrise Home", 40).await;

    let open = issues::create_issue(
        &store,
        NewIssue {
            orphanage_id: orphanage.id.clone(),
            title: "Open issue".to_string(),
            description: "Still collecting".to_string(),
            category: IssueCategory::Food,
            priority: Priority::Medium,
            estimated_cost: 100.0,
            deadline: None,
            images: vec![],
        },
    )
    .await
    .unwrap();
    seed_completed_donation(&store, &open.id, 100.0).await;

    let outcomes = generate_success_stories(&store).await.unwrap();
    assert!(outcomes.is_empty());
}
