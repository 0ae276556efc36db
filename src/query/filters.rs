//! Filter keys of the job board's list pages.

use crate::query::descriptor::filter_keys;

filter_keys! {
    /// Public job search and the employer's own listings.
    JobFilter {
        Category => ("category", Single),
        JobType => ("job_type", Many),
        Salary => ("salary", Range),
        Skills => ("skills", Many),
        Location => ("location", Single),
    }
}

filter_keys! {
    /// Admin category and skill lists.
    CatalogFilter {
        Status => ("status", Single),
    }
}

filter_keys! {
    /// Admin user list.
    UserFilter {
        Role => ("role", Many),
        Status => ("status", Single),
    }
}

filter_keys! {
    /// Applicants of one job.
    ApplicationFilter {
        Status => ("status", Many),
    }
}

/// Value of the `status` filter selecting enabled records.
pub const STATUS_ENABLED: &str = "enabled";
/// Value of the `status` filter selecting disabled records.
pub const STATUS_DISABLED: &str = "disabled";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::config::QueryConfig;
    use crate::query::descriptor::{FilterKey, FilterKind, FilterValue, QueryDescriptor};

    #[test]
    fn job_filter_keys_declare_their_kinds() {
        assert_eq!(JobFilter::Salary.kind(), FilterKind::Range);
        assert_eq!(JobFilter::Skills.kind(), FilterKind::Many);
        assert_eq!(JobFilter::from_name("job_type"), Some(JobFilter::JobType));
    }

    #[test]
    fn job_query_string_parses_every_filter() {
        let descriptor = QueryDescriptor::<JobFilter>::from_query_string(
            "page=2&limit=25&search=backend&category=3&job_type=contract&job_type=full_time\
             &salary_min=50000&skills=4&skills=9&location=Berlin",
            &QueryConfig::default(),
        )
        .unwrap();

        assert_eq!(descriptor.page(), 2);
        assert_eq!(descriptor.page_size(), 25);
        assert_eq!(descriptor.search(), "backend");
        assert_eq!(
            descriptor.filter(JobFilter::Category),
            Some(&FilterValue::single("3"))
        );
        assert_eq!(
            descriptor.filter(JobFilter::JobType),
            Some(&FilterValue::many(["contract", "full_time"]))
        );
        assert_eq!(
            descriptor.filter(JobFilter::Salary),
            Some(&FilterValue::range(Some(50000), None))
        );
        assert_eq!(
            descriptor.filter(JobFilter::Skills),
            Some(&FilterValue::many(["4", "9"]))
        );
        assert_eq!(
            descriptor.filter(JobFilter::Location),
            Some(&FilterValue::single("Berlin"))
        );
    }

    #[test]
    fn status_filter_set_then_cleared_leaves_no_key() {
        let descriptor = QueryDescriptor::<CatalogFilter>::initial(&QueryConfig::default())
            .with_filter(CatalogFilter::Status, FilterValue::single(STATUS_ENABLED))
            .unwrap()
            .without_filter(CatalogFilter::Status);

        assert!(descriptor.filter(CatalogFilter::Status).is_none());
        assert_eq!(descriptor.to_query_string().unwrap(), "page=1&limit=10");
    }
}
