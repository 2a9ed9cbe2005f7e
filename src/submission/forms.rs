use rocket::FromForm;

// Every field is kept as the raw submitted text (or absent).
// Parsing and range checks happen in `validate` so that each
// rejection carries its own message instead of a generic form error.

#[derive(Debug, Clone, Default, FromForm)]
pub struct AddScoreForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub minutes: Option<String>,
    pub seconds: Option<String>,
    pub milliseconds: Option<String>,
    pub rings: Option<String>,
}

#[derive(Debug, Clone, Default, FromForm)]
pub struct DeleteScoreForm {
    pub id: Option<String>,
    pub password: Option<String>,
}
