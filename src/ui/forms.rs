use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Equipment, EquipmentChanges, EquipmentDraft, Status};
use crate::service::Confirmation;

/// Fields of the equipment form, in tab order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum EquipmentField {
    #[default]
    Name,
    Id,
    Category,
    Status,
}

impl EquipmentField {
    pub(crate) fn label(self) -> &'static str {
        match self {
            EquipmentField::Name => "Equipment Name",
            EquipmentField::Id => "Equipment ID",
            EquipmentField::Category => "Category",
            EquipmentField::Status => "Status",
        }
    }
}

/// Internal representation of the add/edit form.
#[derive(Default, Clone, Debug)]
pub(crate) struct EquipmentForm {
    pub(crate) name: String,
    pub(crate) id: String,
    pub(crate) category: String,
    pub(crate) status: Status,
    pub(crate) active: EquipmentField,
    /// Set when editing: the id is the primary key and cannot change.
    pub(crate) id_locked: bool,
    pub(crate) error: Option<String>,
}

impl EquipmentForm {
    /// Populate the form from an existing record when editing.
    pub(crate) fn from_equipment(equipment: &Equipment) -> Self {
        Self {
            name: equipment.name.clone(),
            id: equipment.id.clone(),
            category: equipment.category.clone(),
            status: equipment.status,
            active: EquipmentField::Name,
            id_locked: true,
            error: None,
        }
    }

    pub(crate) fn fields(&self) -> &'static [EquipmentField] {
        if self.id_locked {
            &[
                EquipmentField::Name,
                EquipmentField::Category,
                EquipmentField::Status,
            ]
        } else {
            &[
                EquipmentField::Name,
                EquipmentField::Id,
                EquipmentField::Category,
                EquipmentField::Status,
            ]
        }
    }

    /// Move focus forward (or backward) through the editable fields.
    pub(crate) fn cycle_field(&mut self, forward: bool) {
        let fields = self.fields();
        let current = fields
            .iter()
            .position(|field| *field == self.active)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % fields.len()
        } else {
            (current + fields.len() - 1) % fields.len()
        };
        self.active = fields[next];
    }

    /// Append a character to the active field. On the status field, space
    /// flips the status instead.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            EquipmentField::Name => self.name.push(ch),
            EquipmentField::Id => self.id.push(ch),
            EquipmentField::Category => self.category.push(ch),
            EquipmentField::Status => {
                if ch != ' ' {
                    return false;
                }
                self.status = self.status.toggled();
            }
        }
        true
    }

    pub(crate) fn toggle_status(&mut self) {
        if self.active == EquipmentField::Status {
            self.status = self.status.toggled();
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            EquipmentField::Name => {
                self.name.pop();
            }
            EquipmentField::Id => {
                self.id.pop();
            }
            EquipmentField::Category => {
                self.category.pop();
            }
            EquipmentField::Status => {}
        }
    }

    pub(crate) fn draft(&self) -> EquipmentDraft {
        EquipmentDraft {
            name: self.name.clone(),
            id: self.id.clone(),
            category: self.category.clone(),
            status: self.status,
        }
    }

    pub(crate) fn changes(&self) -> EquipmentChanges {
        EquipmentChanges {
            name: self.name.clone(),
            category: self.category.clone(),
            status: self.status,
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: EquipmentField) -> Line<'static> {
        let is_active = self.active == field;
        let (display, empty) = match field {
            EquipmentField::Status => (format!("< {} >", self.status), false),
            _ => {
                let value = self.value(field);
                if value.is_empty() {
                    ("<required>".to_string(), true)
                } else {
                    (value.to_string(), false)
                }
            }
        };

        let style = if field == EquipmentField::Id && self.id_locked {
            Style::default().fg(Color::DarkGray)
        } else if is_active {
            Style::default().fg(Color::Yellow)
        } else if empty {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    fn value(&self, field: EquipmentField) -> &str {
        match field {
            EquipmentField::Name => &self.name,
            EquipmentField::Id => &self.id,
            EquipmentField::Category => &self.category,
            EquipmentField::Status => self.status.as_str(),
        }
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: EquipmentField) -> usize {
        self.value(field).chars().count()
    }
}

/// A user action waiting for answers from the holder prompt or a yes/no
/// dialog before it is handed to the inventory service.
#[derive(Clone, Debug)]
pub(crate) enum Pending {
    Add(EquipmentForm),
    Update {
        original: Equipment,
        form: EquipmentForm,
    },
    Toggle(Equipment),
    Clear,
}

impl Pending {
    /// Whether the action puts equipment in use and so needs a student id.
    pub(crate) fn needs_holder(&self) -> bool {
        match self {
            Pending::Add(form) | Pending::Update { form, .. } => form.status == Status::InUse,
            Pending::Toggle(equipment) => !equipment.is_in_use(),
            Pending::Clear => false,
        }
    }

    /// Yes/no question the service will ask, if any.
    pub(crate) fn confirmation(&self) -> Option<Confirmation> {
        match self {
            Pending::Add(_) => Some(Confirmation::AddRecord),
            Pending::Clear => Some(Confirmation::ClearAll),
            Pending::Toggle(equipment) if equipment.is_in_use() => {
                Some(Confirmation::ReturnEquipment)
            }
            Pending::Toggle(_) | Pending::Update { .. } => None,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct HolderPrompt {
    pub(crate) pending: Pending,
    pub(crate) input: String,
}

#[derive(Clone, Debug)]
pub(crate) struct ConfirmPrompt {
    pub(crate) question: Confirmation,
    pub(crate) pending: Pending,
    pub(crate) holder: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HOLDER_NONE;

    fn equipment(status: Status) -> Equipment {
        Equipment {
            name: "Football".into(),
            id: "F1".into(),
            category: "Ball".into(),
            status,
            holder: HOLDER_NONE.into(),
        }
    }

    #[test]
    fn edit_form_skips_locked_id() {
        let mut form = EquipmentForm::from_equipment(&equipment(Status::Available));
        let mut seen = Vec::new();
        for _ in 0..3 {
            form.cycle_field(true);
            seen.push(form.active);
        }
        assert_eq!(
            seen,
            vec![
                EquipmentField::Category,
                EquipmentField::Status,
                EquipmentField::Name
            ]
        );
    }

    #[test]
    fn typing_goes_to_active_field_and_space_flips_status() {
        let mut form = EquipmentForm::default();
        for ch in "Net".chars() {
            form.push_char(ch);
        }
        form.active = EquipmentField::Status;
        assert!(form.push_char(' '));
        assert!(!form.push_char('x'));

        let draft = form.draft();
        assert_eq!(draft.name, "Net");
        assert_eq!(draft.status, Status::InUse);
    }

    #[test]
    fn pending_actions_ask_the_right_questions() {
        let mut form = EquipmentForm::default();
        assert!(!Pending::Add(form.clone()).needs_holder());
        form.status = Status::InUse;
        assert!(Pending::Add(form.clone()).needs_holder());
        assert_eq!(
            Pending::Add(form).confirmation(),
            Some(Confirmation::AddRecord)
        );

        let issue = Pending::Toggle(equipment(Status::Available));
        assert!(issue.needs_holder());
        assert_eq!(issue.confirmation(), None);

        let give_back = Pending::Toggle(equipment(Status::InUse));
        assert!(!give_back.needs_holder());
        assert_eq!(
            give_back.confirmation(),
            Some(Confirmation::ReturnEquipment)
        );
    }
}
