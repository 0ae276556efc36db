use serde::Deserialize;
use validator::Validate;

use crate::domain::types::CatalogName;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Body of the admin category and skill create endpoints.
pub struct CatalogForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

impl TryFrom<CatalogForm> for CatalogName {
    type Error = FormError;

    fn try_from(form: CatalogForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(CatalogName::new(ammonia::clean(&form.name))?)
    }
}
