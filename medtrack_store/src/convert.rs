use medtrack_core::MedicalEvent;
use medtrack_entities::medical_events;
use sea_orm::Set;

pub fn event_from_model(m: medical_events::Model) -> MedicalEvent {
    MedicalEvent {
        subject_key: m.subject_key,
        timestamp: m.timestamp,
        event_label: m.event_label,
        dosage: m.dosage,
        duration_minutes: m.duration_minutes,
    }
}

pub fn active_model_from_event(event: &MedicalEvent) -> medical_events::ActiveModel {
    medical_events::ActiveModel {
        subject_key: Set(event.subject_key.clone()),
        timestamp: Set(event.timestamp.clone()),
        event_label: Set(event.event_label.clone()),
        dosage: Set(event.dosage.clone()),
        duration_minutes: Set(event.duration_minutes.clone()),
    }
}
