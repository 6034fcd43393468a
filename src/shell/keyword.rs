use strum::{Display, EnumString, IntoStaticStr};

/// Words with a fixed meaning in shell commands.
///
/// Matched case-insensitively; displayed in their canonical lower-case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, IntoStaticStr)]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
pub enum Keyword {
    CreateTable,
    DropTable,
    ListTables,

    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    And,
    Update,
    Set,
    Delete,

    Info,
    Help,
    Exit,
}

impl Keyword {
    /// Keywords that start a command.
    pub fn is_command(self) -> bool {
        matches!(
            self,
            Self::CreateTable
                | Self::DropTable
                | Self::ListTables
                | Self::Insert
                | Self::Select
                | Self::Update
                | Self::Delete
                | Self::Info
                | Self::Help
                | Self::Exit
        )
    }
}
