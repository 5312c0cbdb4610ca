//! Integration tests for the complaint and profile repositories.
//!
//! Exercises the repository layer against a real database:
//! - Insert defaults (status, empty attachment lists)
//! - Ticket uniqueness and immutability
//! - Unrestricted status updates
//! - Joined listing used by the admin view

use assert_matches::assert_matches;
use complaints_core::complaint::ComplaintStatus;
use complaints_core::roles::Role;
use complaints_core::ticket;
use complaints_db::models::complaint::CreateComplaint;
use complaints_db::models::profile::{CreateProfile, Profile};
use complaints_db::models::user::CreateUser;
use complaints_db::repositories::{ComplaintRepo, ProfileRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_profile(pool: &PgPool, email: &str, role: Role) -> Profile {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .expect("user insert should succeed");

    ProfileRepo::create(
        pool,
        &CreateProfile {
            id: user.id,
            name: format!("Name of {email}"),
            role,
            id_card_number: format!("ID-{}", user.id),
        },
    )
    .await
    .expect("profile insert should succeed")
}

fn new_complaint(user_id: i64, ticket: &str) -> CreateComplaint {
    CreateComplaint {
        user_id,
        ticket: ticket.to_string(),
        reason: "Noisy AC".to_string(),
        details: "Room 204 AC is loud at night".to_string(),
        image_urls: Vec::new(),
        video_urls: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_bootstrap(pool: PgPool) {
    complaints_db::health_check(&pool).await.unwrap();

    for table in ["users", "profiles", "user_sessions", "complaints"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_defaults_to_pending_with_empty_lists(pool: PgPool) {
    let profile = create_profile(&pool, "student@test.com", Role::Student).await;

    let complaint = ComplaintRepo::create(&pool, &new_complaint(profile.id, "BT-AAAAAA"))
        .await
        .unwrap();

    assert_eq!(complaint.status, ComplaintStatus::Pending);
    assert!(complaint.image_urls.is_empty());
    assert!(complaint.video_urls.is_empty());
    assert_eq!(complaint.user_id, profile.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_attachment_order_is_preserved(pool: PgPool) {
    let profile = create_profile(&pool, "order@test.com", Role::Staff).await;
    let mut input = new_complaint(profile.id, "BT-ORDER1");
    input.image_urls = vec!["c".into(), "a".into(), "b".into()];
    input.video_urls = vec!["z".into(), "y".into()];

    let created = ComplaintRepo::create(&pool, &input).await.unwrap();
    let fetched = ComplaintRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("complaint should exist");

    assert_eq!(fetched.image_urls, vec!["c", "a", "b"]);
    assert_eq!(fetched.video_urls, vec!["z", "y"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_ticket_is_rejected(pool: PgPool) {
    let profile = create_profile(&pool, "dup@test.com", Role::Student).await;
    ComplaintRepo::create(&pool, &new_complaint(profile.id, "BT-DUPE01"))
        .await
        .unwrap();

    let err = ComplaintRepo::create(&pool, &new_complaint(profile.id, "BT-DUPE01"))
        .await
        .expect_err("second insert with the same ticket must fail");

    assert_matches!(
        err,
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some("uq_complaints_ticket")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ticket_is_immutable(pool: PgPool) {
    let profile = create_profile(&pool, "immutable@test.com", Role::Student).await;
    let complaint = ComplaintRepo::create(&pool, &new_complaint(profile.id, "BT-FIXED1"))
        .await
        .unwrap();

    let result = sqlx::query("UPDATE complaints SET ticket = 'BT-OTHER1' WHERE id = $1")
        .bind(complaint.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "changing a ticket must be refused");

    let still = ComplaintRepo::find_by_ticket(&pool, "BT-FIXED1").await.unwrap();
    assert!(still.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_by_ticket_miss_is_none(pool: PgPool) {
    let found = ComplaintRepo::find_by_ticket(&pool, "BT-NOPE00").await.unwrap();
    assert!(found.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_generate_ticket_returns_unused_code(pool: PgPool) {
    let profile = create_profile(&pool, "gen@test.com", Role::Student).await;

    let first = ComplaintRepo::generate_ticket(&pool)
        .await
        .unwrap()
        .expect("a ticket should be available");
    assert!(ticket::is_well_formed(&first));
    ComplaintRepo::create(&pool, &new_complaint(profile.id, &first))
        .await
        .unwrap();

    assert!(ComplaintRepo::ticket_exists(&pool, &first).await.unwrap());

    let second = ComplaintRepo::generate_ticket(&pool).await.unwrap().unwrap();
    assert_ne!(first, second);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_status_can_move_in_any_direction(pool: PgPool) {
    let profile = create_profile(&pool, "status@test.com", Role::Student).await;
    let complaint = ComplaintRepo::create(&pool, &new_complaint(profile.id, "BT-STAT01"))
        .await
        .unwrap();

    let sequence = [
        ComplaintStatus::Resolved,
        ComplaintStatus::Pending,
        ComplaintStatus::Resolving,
        ComplaintStatus::Seen,
        ComplaintStatus::Seen,
    ];
    for status in sequence {
        let updated = ComplaintRepo::update_status(&pool, complaint.id, status)
            .await
            .unwrap()
            .expect("complaint should exist");
        assert_eq!(updated.status, status);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_status_unknown_id_is_none(pool: PgPool) {
    let updated = ComplaintRepo::update_status(&pool, 999_999, ComplaintStatus::Seen)
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_with_submitters_is_newest_first(pool: PgPool) {
    let student = create_profile(&pool, "s@test.com", Role::Student).await;
    let staff = create_profile(&pool, "t@test.com", Role::Staff).await;

    ComplaintRepo::create(&pool, &new_complaint(student.id, "BT-LIST01"))
        .await
        .unwrap();
    ComplaintRepo::create(&pool, &new_complaint(staff.id, "BT-LIST02"))
        .await
        .unwrap();

    let rows = ComplaintRepo::list_with_submitters(&pool).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].complaint.ticket, "BT-LIST02");
    assert_eq!(rows[0].submitter.role, Role::Staff);
    assert_eq!(rows[0].submitter.id_card_number, format!("ID-{}", staff.id));
    assert_eq!(rows[1].submitter.role, Role::Student);
    assert_eq!(rows[1].submitter.name, "Name of s@test.com");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_status_in_row_fails_to_decode(pool: PgPool) {
    let profile = create_profile(&pool, "decode@test.com", Role::Student).await;
    let complaint = ComplaintRepo::create(&pool, &new_complaint(profile.id, "BT-DECODE"))
        .await
        .unwrap();

    // Bypass the CHECK constraint to simulate a value the code does not know.
    sqlx::query("ALTER TABLE complaints DROP CONSTRAINT ck_complaints_status")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE complaints SET status = 'archived' WHERE id = $1")
        .bind(complaint.id)
        .execute(&pool)
        .await
        .unwrap();

    let result = ComplaintRepo::find_by_id(&pool, complaint.id).await;
    assert!(result.is_err(), "unknown status must not decode");
}
