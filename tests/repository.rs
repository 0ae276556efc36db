use jobboard::domain::application::{ApplicationStatus, NewApplication};
use jobboard::domain::catalog::{Category, Skill};
use jobboard::domain::job::{Job, JobType, NewJob};
use jobboard::domain::types::{
    CatalogName, CompanyName, CoverLetter, JobDescription, JobTitle, LocationName, SalaryRange,
    SkillId, UserId,
};
use jobboard::domain::user::Role;
use jobboard::query::SortOrder;
use jobboard::repository::errors::RepositoryError;
use jobboard::repository::{
    ApplicationListQuery, ApplicationReader, ApplicationWriter, CatalogListQuery, CategoryReader,
    CategoryWriter, DieselRepository, JobListQuery, JobReader, JobWriter, SkillWriter,
    UserListQuery, UserReader, UserWriter,
};

mod common;

fn category(repo: &DieselRepository, name: &str) -> Category {
    repo.create_category(&CatalogName::new(name).unwrap())
        .expect("create category")
}

fn skill(repo: &DieselRepository, name: &str) -> Skill {
    repo.create_skill(&CatalogName::new(name).unwrap())
        .expect("create skill")
}

struct JobSeed<'a> {
    title: &'a str,
    location: &'a str,
    job_type: JobType,
    salary: (Option<i64>, Option<i64>),
    skills: Vec<SkillId>,
}

fn job(repo: &DieselRepository, employer_id: UserId, category: &Category, seed: JobSeed) -> Job {
    repo.create_job(&NewJob {
        employer_id,
        category_id: category.id,
        title: JobTitle::new(seed.title).unwrap(),
        company: CompanyName::new("Acme").unwrap(),
        location: LocationName::new(seed.location).unwrap(),
        description: JobDescription::new(format!("We are hiring a {}", seed.title)).unwrap(),
        job_type: seed.job_type,
        salary: SalaryRange::new(seed.salary.0, seed.salary.1).unwrap(),
        skills: seed.skills,
    })
    .expect("create job")
}

#[test]
fn test_job_listing_filters() {
    let test_db = common::TestDb::new("test_job_listing_filters.db");
    let repo = test_db.repo();

    let employer = common::seed_user(&repo, "Employer", Role::Employer);
    let engineering = category(&repo, "Engineering");
    let sales = category(&repo, "Sales");
    let rust = skill(&repo, "Rust");
    let sql = skill(&repo, "SQL");

    let backend = job(
        &repo,
        employer.id,
        &engineering,
        JobSeed {
            title: "Backend Engineer",
            location: "Berlin",
            job_type: JobType::FullTime,
            salary: (Some(60_000), Some(90_000)),
            skills: vec![rust.id, sql.id],
        },
    );
    let contractor = job(
        &repo,
        employer.id,
        &engineering,
        JobSeed {
            title: "Rust Contractor",
            location: "Remote",
            job_type: JobType::Contract,
            salary: (None, None),
            skills: vec![rust.id],
        },
    );
    let account_exec = job(
        &repo,
        employer.id,
        &sales,
        JobSeed {
            title: "Account Executive",
            location: "Berlin",
            job_type: JobType::FullTime,
            salary: (Some(30_000), Some(40_000)),
            skills: Vec::new(),
        },
    );

    assert_eq!(backend.skills, vec![rust.id, sql.id]);

    let (total, items) = repo.list_jobs(JobListQuery::open()).unwrap();
    assert_eq!(total, 3);
    assert_eq!(items[0].id, account_exec.id);

    let (total, items) = repo
        .list_jobs(JobListQuery::open().category(engineering.id))
        .unwrap();
    assert_eq!(total, 2);
    assert!(items.iter().all(|job| job.category_id == engineering.id));

    let (total, items) = repo
        .list_jobs(JobListQuery::open().job_types([JobType::Contract]))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, contractor.id);

    // Salary filters keep overlapping and open-ended ranges.
    let (_, items) = repo
        .list_jobs(JobListQuery::open().salary(Some(50_000), None))
        .unwrap();
    let mut ids: Vec<_> = items.iter().map(|job| job.id).collect();
    ids.sort();
    assert_eq!(ids, vec![backend.id, contractor.id]);

    let (total, _) = repo
        .list_jobs(JobListQuery::open().skills([sql.id]))
        .unwrap();
    assert_eq!(total, 1);

    let (total, _) = repo
        .list_jobs(JobListQuery::open().search("rust"))
        .unwrap();
    assert_eq!(total, 1);

    let (total, items) = repo
        .list_jobs(JobListQuery::open().location("berlin").sort(SortOrder::Oldest))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].id, backend.id);

    let (total, items) = repo
        .list_jobs(JobListQuery::open().paginate(2, 2))
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, backend.id);
}

#[test]
fn test_job_delete_cascades_to_applications() {
    let test_db = common::TestDb::new("test_job_delete_cascades.db");
    let repo = test_db.repo();

    let employer = common::seed_user(&repo, "Employer", Role::Employer);
    let candidate = common::seed_user(&repo, "Candidate", Role::Candidate);
    let engineering = category(&repo, "Engineering");
    let posting = job(
        &repo,
        employer.id,
        &engineering,
        JobSeed {
            title: "Backend Engineer",
            location: "Remote",
            job_type: JobType::FullTime,
            salary: (None, None),
            skills: Vec::new(),
        },
    );

    let application = repo
        .create_application(&NewApplication {
            job_id: posting.id,
            candidate_id: candidate.id,
            cover_letter: CoverLetter::new("Hello").unwrap(),
        })
        .unwrap();

    repo.delete_job(posting.id).unwrap();
    assert!(repo.get_job_by_id(posting.id).unwrap().is_none());
    assert!(repo.get_application_by_id(application.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_job(posting.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_application_repository() {
    let test_db = common::TestDb::new("test_application_repository.db");
    let repo = test_db.repo();

    let employer = common::seed_user(&repo, "Employer", Role::Employer);
    let alice = common::seed_user(&repo, "Alice", Role::Candidate);
    let bob = common::seed_user(&repo, "Bob", Role::Candidate);
    let engineering = category(&repo, "Engineering");
    let posting = job(
        &repo,
        employer.id,
        &engineering,
        JobSeed {
            title: "Backend Engineer",
            location: "Remote",
            job_type: JobType::FullTime,
            salary: (None, None),
            skills: Vec::new(),
        },
    );

    let apply = |candidate_id| NewApplication {
        job_id: posting.id,
        candidate_id,
        cover_letter: CoverLetter::new("I would love to join").unwrap(),
    };

    let first = repo.create_application(&apply(alice.id)).unwrap();
    assert_eq!(first.status, ApplicationStatus::Pending);
    repo.create_application(&apply(bob.id)).unwrap();

    assert!(matches!(
        repo.create_application(&apply(alice.id)),
        Err(RepositoryError::ConstraintViolation(_))
    ));

    let reviewed = repo
        .update_application_status(first.id, ApplicationStatus::Reviewed)
        .unwrap();
    assert_eq!(reviewed.status, ApplicationStatus::Reviewed);

    let (total, _) = repo
        .list_applications(ApplicationListQuery::new(posting.id))
        .unwrap();
    assert_eq!(total, 2);

    let (total, items) = repo
        .list_applications(ApplicationListQuery::new(posting.id).search("bob@"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].candidate.id, bob.id);

    let (total, items) = repo
        .list_applications(
            ApplicationListQuery::new(posting.id).statuses([ApplicationStatus::Reviewed]),
        )
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].application.id, first.id);
}

#[test]
fn test_catalog_repository() {
    let test_db = common::TestDb::new("test_catalog_repository.db");
    let repo = test_db.repo();

    let employer = common::seed_user(&repo, "Employer", Role::Employer);
    let engineering = category(&repo, "Engineering");
    let design = category(&repo, "Design");

    assert!(matches!(
        repo.create_category(&CatalogName::new("engineering").unwrap()),
        Err(RepositoryError::ConstraintViolation(_))
    ));

    let disabled = repo.set_category_enabled(design.id, false).unwrap();
    assert!(!disabled.enabled);

    let (total, items) = repo
        .list_categories(CatalogListQuery::new().enabled(true))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, engineering.id);

    let (_, items) = repo.list_categories(CatalogListQuery::new()).unwrap();
    let names: Vec<_> = items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Design", "Engineering"]);

    job(
        &repo,
        employer.id,
        &engineering,
        JobSeed {
            title: "Backend Engineer",
            location: "Remote",
            job_type: JobType::FullTime,
            salary: (None, None),
            skills: Vec::new(),
        },
    );
    assert!(matches!(
        repo.delete_category(engineering.id),
        Err(RepositoryError::ConstraintViolation(_))
    ));

    repo.delete_category(design.id).unwrap();
    assert!(repo.get_category_by_id(design.id).unwrap().is_none());
}

#[test]
fn test_user_repository() {
    let test_db = common::TestDb::new("test_user_repository.db");
    let repo = test_db.repo();

    let admin = common::seed_user(&repo, "Admin", Role::Admin);
    let employer = common::seed_user(&repo, "Employer", Role::Employer);
    common::seed_user(&repo, "Candidate", Role::Candidate);

    let found = repo.get_user_by_email(&employer.email).unwrap().unwrap();
    assert_eq!(found.id, employer.id);

    repo.set_user_enabled(employer.id, false).unwrap();

    let (total, items) = repo
        .list_users(UserListQuery::new().roles([Role::Employer, Role::Admin]))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].id, admin.id);

    let (total, _) = repo.list_users(UserListQuery::new().enabled(false)).unwrap();
    assert_eq!(total, 1);

    let (total, _) = repo.list_users(UserListQuery::new().search("cand")).unwrap();
    assert_eq!(total, 1);
}
