#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use medtrack_core::{
    Clock, EventFilter, EventRepo, Mailer, MedicalEvent, OutgoingEmail, ProfileApi, ProfileClient,
};
use medtrack_skill::{MedTrackSkill, RequestEnvelope, ResponseEnvelope, SkillSettings};
use serde_json::{Value, json};
use tokio::sync::mpsc;

#[derive(Default)]
struct MemoryRepo {
    events: Mutex<Vec<MedicalEvent>>,
    fail_put: AtomicBool,
    fail_query: AtomicBool,
    queries: AtomicUsize,
}

#[async_trait]
impl EventRepo for MemoryRepo {
    async fn put(&self, event: &MedicalEvent) -> anyhow::Result<()> {
        if self.fail_put.load(Ordering::SeqCst) {
            anyhow::bail!("table is read-only");
        }
        let mut events = self.events.lock().unwrap();
        events.retain(|e| !(e.subject_key == event.subject_key && e.timestamp == event.timestamp));
        events.push(event.clone());
        Ok(())
    }

    async fn query(&self, filter: &EventFilter) -> anyhow::Result<Vec<MedicalEvent>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_query.load(Ordering::SeqCst) {
            anyhow::bail!("table is unavailable");
        }
        let events = self.events.lock().unwrap();
        Ok(events.iter().filter(|e| filter.matches(e)).cloned().collect())
    }
}

struct StaticProfile {
    email: Option<String>,
}

#[async_trait]
impl ProfileClient for StaticProfile {
    async fn email(&self, api: &ProfileApi) -> anyhow::Result<String> {
        assert_eq!(api.endpoint, "https://api.example.com");
        assert_eq!(api.access_token, "token-1");
        self.email
            .clone()
            .ok_or_else(|| anyhow::anyhow!("permission not granted"))
    }
}

struct ChannelMailer {
    tx: mpsc::UnboundedSender<OutgoingEmail>,
}

#[async_trait]
impl Mailer for ChannelMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        self.tx.send(email.clone())?;
        Ok(())
    }
}

struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: &OutgoingEmail) -> anyhow::Result<()> {
        anyhow::bail!("mail service rejected the message")
    }
}

struct StalledMailer;

#[async_trait]
impl Mailer for StalledMailer {
    async fn send(&self, _email: &OutgoingEmail) -> anyhow::Result<()> {
        std::future::pending().await
    }
}

struct FixedClock(NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

struct Harness {
    skill: MedTrackSkill,
    repo: Arc<MemoryRepo>,
    outbox: mpsc::UnboundedReceiver<OutgoingEmail>,
}

fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn harness_at(now: NaiveDateTime, email: Option<&str>) -> Harness {
    let repo = Arc::new(MemoryRepo::default());
    let (tx, outbox) = mpsc::unbounded_channel();
    let skill = MedTrackSkill::new(
        repo.clone(),
        Arc::new(StaticProfile {
            email: email.map(str::to_string),
        }),
        Arc::new(ChannelMailer { tx }),
        SkillSettings {
            sender: "reports@example.com".to_string(),
        },
    )
    .with_clock(Arc::new(FixedClock(now)));

    Harness { skill, repo, outbox }
}

fn harness() -> Harness {
    harness_at(at(6, 15, 14, 30), Some("carer@example.com"))
}

fn envelope(request: &Value) -> RequestEnvelope {
    serde_json::from_value(json!({
        "version": "1.0",
        "session": {"user": {"userId": "U1"}},
        "context": {
            "System": {
                "apiEndpoint": "https://api.example.com",
                "apiAccessToken": "token-1",
                "user": {"userId": "U1"}
            }
        },
        "request": request
    }))
    .unwrap()
}

fn intent(name: &str, slots: &[(&str, &str)]) -> RequestEnvelope {
    let slots: serde_json::Map<String, Value> = slots
        .iter()
        .map(|(slot, value)| ((*slot).to_string(), json!({"name": slot, "value": value})))
        .collect();

    envelope(&json!({
        "type": "IntentRequest",
        "requestId": "req-1",
        "intent": {"name": name, "slots": slots}
    }))
}

async fn say(harness: &Harness, request: &RequestEnvelope) -> ResponseEnvelope {
    harness.skill.handle(request).await
}

async fn next_email(harness: &mut Harness) -> OutgoingEmail {
    tokio::time::timeout(Duration::from_secs(2), harness.outbox.recv())
        .await
        .unwrap()
        .unwrap()
}

const APOLOGY: &str = "Sorry, I had trouble doing what you asked. Please try again.";

#[tokio::test]
async fn medicine_is_recorded_and_recalled() {
    let h = harness();

    let stored = say(
        &h,
        &intent(
            "AddMedicineGivenIntent",
            &[
                ("name", "Bob"),
                ("medicine_name", "Aspirin"),
                ("amount_of_medicine", "5mg"),
            ],
        ),
    )
    .await;
    assert_eq!(stored.speech(), Some("I am putting that in the database now."));

    let events = h.repo.events.lock().unwrap().clone();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].subject_key, "U1#Bob");
    assert_eq!(events[0].timestamp, "06/15/2024, 14:30:00");
    assert_eq!(events[0].event_label, "Medicine Given - Aspirin");
    assert_eq!(events[0].dosage.as_deref(), Some("5mg"));

    let answer = say(
        &h,
        &intent(
            "WhenQuestionIntent",
            &[("name", "Bob"), ("medicine_name", "Aspirin")],
        ),
    )
    .await;
    assert_eq!(
        answer.speech(),
        Some("Bob was most recently given 5mg of Aspirin on 6/15/2024, 2:30:00 PM.")
    );
}

#[tokio::test]
async fn activity_lookup_answers_latest_occurrence() {
    let h = harness();
    {
        let mut events = h.repo.events.lock().unwrap();
        for (timestamp, label) in [
            ("06/10/2024, 09:00:00", "physical therapy"),
            ("06/14/2024, 16:45:00", "physical therapy"),
            ("06/15/2024, 08:00:00", "Medicine Given - Aspirin"),
        ] {
            events.push(MedicalEvent {
                subject_key: "U1#Bob".to_string(),
                timestamp: timestamp.to_string(),
                event_label: label.to_string(),
                dosage: None,
                duration_minutes: None,
            });
        }
    }

    let answer = say(
        &h,
        &intent(
            "WhenQuestionIntent",
            &[("name", "Bob"), ("medical_activity", "physical therapy")],
        ),
    )
    .await;
    assert_eq!(
        answer.speech(),
        Some("Bob's most recent physical therapy was on 6/14/2024, 4:45:00 PM.")
    );

    let missing = say(
        &h,
        &intent("WhenQuestionIntent", &[("name", "Bob"), ("medical_activity", "nap")]),
    )
    .await;
    assert_eq!(missing.speech(), Some("No nap found for Bob."));
}

#[tokio::test]
async fn activity_with_duration_is_recorded() {
    let h = harness();

    let stored = say(
        &h,
        &intent(
            "AddMedicalActivityIntent",
            &[
                ("name", "Bob"),
                ("event", "physical therapy"),
                ("number_of_minutes", "45"),
            ],
        ),
    )
    .await;
    assert_eq!(stored.speech(), Some("I am putting that in the database now."));

    let events = h.repo.events.lock().unwrap().clone();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_label, "physical therapy");
    assert_eq!(events[0].duration_minutes.as_deref(), Some("45"));
    assert_eq!(events[0].dosage, None);
}

#[tokio::test]
async fn period_history_is_emailed() {
    let mut h = harness();
    {
        let mut events = h.repo.events.lock().unwrap();
        events.push(MedicalEvent {
            subject_key: "U1#Bob".to_string(),
            timestamp: "06/14/2024, 10:00:00".to_string(),
            event_label: "physical therapy".to_string(),
            dosage: None,
            duration_minutes: Some("30".to_string()),
        });
        events.push(MedicalEvent {
            subject_key: "U1#Bob".to_string(),
            timestamp: "06/01/2024, 10:00:00".to_string(),
            event_label: "too old".to_string(),
            dosage: None,
            duration_minutes: None,
        });
        events.push(MedicalEvent {
            subject_key: "U2#Bob".to_string(),
            timestamp: "06/14/2024, 11:00:00".to_string(),
            event_label: "someone else".to_string(),
            dosage: None,
            duration_minutes: None,
        });
    }

    let response = say(
        &h,
        &intent(
            "RetrieveIntentForPeriodsOfTime",
            &[("name", "Bob"), ("number_of_days", "3")],
        ),
    )
    .await;
    assert_eq!(
        response.speech(),
        Some("I am searching for the data now. I will send you an email with the results.")
    );

    let email = next_email(&mut h).await;
    assert_eq!(email.from, "reports@example.com");
    assert_eq!(email.to, "carer@example.com");
    assert_eq!(email.subject, "Medical History for Bob for the past 3 days");
    assert_eq!(
        email.text,
        "You have requested to see Bob's medical history for the past 3 days:\n\n\
         Event 1: physical therapy\n\
         Date: 6/14/2024, 10:00:00 AM\n\
         Duration: 30 minutes\n\n"
    );
}

#[tokio::test]
async fn email_delivery_never_delays_or_changes_the_reply() {
    let mailers: [Arc<dyn Mailer>; 2] = [Arc::new(FailingMailer), Arc::new(StalledMailer)];

    for mailer in mailers {
        let skill = MedTrackSkill::new(
            Arc::new(MemoryRepo::default()),
            Arc::new(StaticProfile {
                email: Some("carer@example.com".to_string()),
            }),
            mailer,
            SkillSettings {
                sender: "reports@example.com".to_string(),
            },
        )
        .with_clock(Arc::new(FixedClock(at(6, 15, 14, 30))));

        let request = intent(
            "RetrieveIntentForPeriodsOfTime",
            &[("name", "Bob"), ("number_of_days", "3")],
        );
        let response = tokio::time::timeout(Duration::from_secs(2), skill.handle(&request))
            .await
            .unwrap();

        assert_eq!(
            response.speech(),
            Some("I am searching for the data now. I will send you an email with the results.")
        );
    }
}

#[tokio::test]
async fn month_period_clamps_to_end_of_month() {
    let mut h = harness_at(at(3, 31, 12, 0), Some("carer@example.com"));
    {
        let mut events = h.repo.events.lock().unwrap();
        for (timestamp, label) in [
            ("02/28/2024, 23:00:00", "before"),
            ("02/29/2024, 13:00:00", "after"),
        ] {
            events.push(MedicalEvent {
                subject_key: "U1#Bob".to_string(),
                timestamp: timestamp.to_string(),
                event_label: label.to_string(),
                dosage: None,
                duration_minutes: None,
            });
        }
    }

    say(
        &h,
        &intent(
            "RetrieveIntentForPeriodsOfTime",
            &[("name", "Bob"), ("number_of_months", "1")],
        ),
    )
    .await;

    let email = next_email(&mut h).await;
    assert_eq!(email.subject, "Medical History for Bob for the past 1 month");
    assert!(email.text.contains("Event 1: after"));
    assert!(!email.text.contains("before"));
}

#[tokio::test]
async fn specific_date_history_is_emailed() {
    let mut h = harness();
    h.repo.events.lock().unwrap().push(MedicalEvent {
        subject_key: "U1#Bob".to_string(),
        timestamp: "06/12/2024, 08:05:09".to_string(),
        event_label: "Medicine Given - Aspirin".to_string(),
        dosage: Some("5mg".to_string()),
        duration_minutes: None,
    });

    let response = say(
        &h,
        &intent(
            "RetrieveIntentForSpecificDate",
            &[("name", "Bob"), ("date", "2024-06-12")],
        ),
    )
    .await;
    assert_eq!(
        response.speech(),
        Some(
            "I am searching for Bob's activity on 06/12/2024 now. \
             I will send you an email with the results."
        )
    );

    let email = next_email(&mut h).await;
    assert_eq!(email.subject, "Medical History for Bob on 06/12/2024");
    assert_eq!(
        email.text,
        "You have requested to see Bob's medical history on 06/12/2024:\n\n\
         Event 1: Medicine Given - Aspirin\n\
         Date: 6/12/2024, 8:05:09 AM\n\
         Dosage: 5mg\n\n"
    );
}

#[tokio::test]
async fn profile_failure_skips_the_query() {
    let mut h = harness_at(at(6, 15, 14, 30), None);

    let response = say(
        &h,
        &intent(
            "RetrieveIntentForSpecificDate",
            &[("name", "Bob"), ("date", "2024-06-12")],
        ),
    )
    .await;

    assert_eq!(
        response.speech(),
        Some("An error occurred while trying to retrieve your email.")
    );
    assert_eq!(h.repo.queries.load(Ordering::SeqCst), 0);
    assert!(h.outbox.try_recv().is_err());
}

#[tokio::test]
async fn query_failure_is_spoken() {
    let mut h = harness();
    h.repo.fail_query.store(true, Ordering::SeqCst);

    let history = say(
        &h,
        &intent(
            "RetrieveIntentForPeriodsOfTime",
            &[("name", "Bob"), ("number_of_weeks", "2")],
        ),
    )
    .await;
    assert_eq!(
        history.speech(),
        Some("An error occurred while searching for the data.")
    );
    assert!(h.outbox.try_recv().is_err());

    let lookup = say(&h, &intent("WhenQuestionIntent", &[("name", "Bob")])).await;
    assert_eq!(
        lookup.speech(),
        Some("An error occurred while searching for the data.")
    );
}

#[tokio::test]
async fn write_failure_is_spoken() {
    let h = harness();
    h.repo.fail_put.store(true, Ordering::SeqCst);

    let response = say(
        &h,
        &intent(
            "AddMedicalActivityIntent",
            &[("name", "Bob"), ("event", "nap")],
        ),
    )
    .await;

    assert_eq!(
        response.speech(),
        Some("An error occurred while saving that to the database.")
    );
}

#[tokio::test]
async fn invalid_input_gets_the_generic_apology() {
    let h = harness();

    let cases = [
        intent("RetrieveIntentForSpecificDate", &[("name", "Bob")]),
        intent(
            "RetrieveIntentForSpecificDate",
            &[("name", "Bob"), ("date", "2024-W23")],
        ),
        intent("RetrieveIntentForPeriodsOfTime", &[("name", "Bob")]),
        intent("AddMedicineGivenIntent", &[("name", "Bob")]),
        intent(
            "AddMedicalActivityIntent",
            &[("name", "Bob#Alice"), ("event", "nap")],
        ),
        envelope(&json!({"type": "CanFulfillIntentRequest", "requestId": "req-2"})),
    ];

    for request in &cases {
        let response = say(&h, request).await;
        assert_eq!(response.speech(), Some(APOLOGY));
        assert_eq!(response.reprompt(), Some(APOLOGY));
    }

    assert!(h.repo.events.lock().unwrap().is_empty());
    assert_eq!(h.repo.queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn built_in_requests() {
    let h = harness();

    let launch = say(
        &h,
        &envelope(&json!({"type": "LaunchRequest", "requestId": "req-3"})),
    )
    .await;
    assert_eq!(
        launch.speech(),
        Some("Welcome to your medical tracker, how may I help you?")
    );
    assert_eq!(launch.response.should_end_session, Some(false));

    let help = say(&h, &intent("AMAZON.HelpIntent", &[])).await;
    assert!(help.reprompt().is_some());

    let stop = say(&h, &intent("AMAZON.StopIntent", &[])).await;
    assert_eq!(stop.speech(), Some("Goodbye!"));
    assert_eq!(stop.response.should_end_session, Some(true));

    let ended = say(
        &h,
        &envelope(&json!({
            "type": "SessionEndedRequest",
            "requestId": "req-4",
            "reason": "USER_INITIATED"
        })),
    )
    .await;
    assert_eq!(ended.speech(), None);

    let reflected = say(&h, &intent("AMAZON.NavigateHomeIntent", &[])).await;
    assert_eq!(
        reflected.speech(),
        Some("You just triggered AMAZON.NavigateHomeIntent")
    );
}
