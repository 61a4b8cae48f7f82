use crate::db::models::RouteFields;
use crate::error::ClimbwallError;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
}

/// Text fields of the admin route form. Missing fields arrive as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteForm {
    pub name: String,
    pub grade: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sector: String,
    pub description: String,
    pub video_url: String,
}

impl RouteForm {
    /// Assign a multipart text field by its form name; unknown names are ignored.
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = value,
            "grade" => self.grade = value,
            "type" => self.kind = value,
            "sector" => self.sector = value,
            "description" => self.description = value,
            "video_url" => self.video_url = value,
            _ => {}
        }
    }

    /// Trimmed column values. Blank optional fields become `None`; `image_path` is left unset.
    pub fn to_fields(&self) -> RouteFields {
        RouteFields {
            name: self.name.trim().to_string(),
            grade: self.grade.trim().to_string(),
            kind: self.kind.trim().to_string(),
            sector: self.sector.trim().to_string(),
            description: non_blank(&self.description),
            image_path: None,
            video_url: non_blank(&self.video_url),
        }
    }

    /// Column values for an edit: every field is overwritten, blank optionals become `""`.
    pub fn to_overwrite_fields(&self) -> RouteFields {
        RouteFields {
            description: Some(self.description.trim().to_string()),
            video_url: Some(self.video_url.trim().to_string()),
            ..self.to_fields()
        }
    }

    /// Fields the admin form marks as required must be non-blank.
    pub fn validate_required(&self) -> Result<(), ClimbwallError> {
        let required = [
            ("name", &self.name),
            ("grade", &self.grade),
            ("type", &self.kind),
            ("sector", &self.sector),
        ];
        match required.into_iter().find(|(_, v)| v.trim().is_empty()) {
            Some((field, _)) => Err(ClimbwallError::MissingField(field)),
            None => Ok(()),
        }
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_trimmed_and_blank_optionals_dropped() {
        let mut form = RouteForm::default();
        form.set("name", "  Red Crack ".to_string());
        form.set("grade", "6a".to_string());
        form.set("type", "boulder".to_string());
        form.set("sector", "Sector C\n".to_string());
        form.set("description", "   ".to_string());
        form.set("video_url", " https://youtu.be/x ".to_string());
        form.set("unknown", "ignored".to_string());

        let fields = form.to_fields();
        assert_eq!(fields.name, "Red Crack");
        assert_eq!(fields.sector, "Sector C");
        assert_eq!(fields.description, None);
        assert_eq!(fields.video_url.as_deref(), Some("https://youtu.be/x"));
        assert!(form.validate_required().is_ok());
    }

    #[test]
    fn first_blank_required_field_is_reported() {
        let form = RouteForm {
            name: "x".to_string(),
            grade: " ".to_string(),
            ..RouteForm::default()
        };
        assert!(matches!(
            form.validate_required(),
            Err(ClimbwallError::MissingField("grade"))
        ));
    }

    #[test]
    fn overwrite_fields_keep_blank_optionals_as_empty_strings() {
        let form = RouteForm {
            name: " Red Crack ".to_string(),
            description: "  ".to_string(),
            video_url: " https://youtu.be/x ".to_string(),
            ..RouteForm::default()
        };
        let fields = form.to_overwrite_fields();
        assert_eq!(fields.name, "Red Crack");
        assert_eq!(fields.description.as_deref(), Some(""));
        assert_eq!(fields.video_url.as_deref(), Some("https://youtu.be/x"));
        assert_eq!(fields.image_path, None);
    }
}
