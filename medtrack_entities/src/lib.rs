pub mod medical_events;
