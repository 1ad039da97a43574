use drill_core::model::{SessionKey, WordlistId};
use drill_core::practice::{AnswerOutcome, PassEvent, PracticeError, SessionPhase};
use drill_core::time::fixed_now;
use services::{AppServices, Clock, PracticeServiceError, WordSourceError};
use storage::repository::{NewWordlistRecord, Storage, WordlistRepository};

fn key() -> SessionKey {
    SessionKey::new("browser-1").unwrap()
}

async fn spanish(app: &AppServices) -> WordlistId {
    let pairs = services::parse_new_pairs(&["hello", "cat"], &["ola", "gato"]);
    let drafts: Vec<_> = pairs.rows.into_iter().map(|r| r.draft).collect();
    app.wordlists().create_wordlist("Spanish", &drafts).await.unwrap()
}

fn app() -> AppServices {
    AppServices::in_memory(Clock::fixed(fixed_now()))
}

#[tokio::test]
async fn hint_then_correct_completes_in_one_pass() {
    let app = app();
    let list = spanish(&app).await;
    let practice = app.practice();

    let prompt = practice.start_session(&key(), list).await.unwrap();
    assert_eq!(prompt.word.side_a(), "hello");
    assert!(!prompt.is_retry);

    let feedback = practice.submit_answer(&key(), "wrong").await.unwrap();
    assert_eq!(
        feedback.result.outcome,
        AnswerOutcome::IncorrectRetry { hint: "o".into() }
    );
    let next = feedback.next_prompt.unwrap();
    assert_eq!(next.word.side_a(), "hello");
    assert!(next.is_retry);
    assert_eq!(practice.phase(&key()).await.unwrap(), SessionPhase::Retrying);

    let feedback = practice.submit_answer(&key(), "ola").await.unwrap();
    assert_eq!(feedback.result.outcome, AnswerOutcome::Correct);
    assert_eq!(feedback.next_prompt.unwrap().word.side_a(), "cat");

    let feedback = practice.submit_answer(&key(), " GATO ").await.unwrap();
    assert_eq!(feedback.result.pass, PassEvent::SessionComplete);
    assert!(feedback.result.is_complete());
    assert!(feedback.next_prompt.is_none());
    assert_eq!(practice.phase(&key()).await.unwrap(), SessionPhase::NotStarted);
}

#[tokio::test]
async fn missed_word_is_requeued_for_a_second_pass() {
    let app = app();
    let list = spanish(&app).await;
    let practice = app.practice();
    practice.start_session(&key(), list).await.unwrap();

    practice.submit_answer(&key(), "x").await.unwrap();
    let feedback = practice.submit_answer(&key(), "y").await.unwrap();
    assert_eq!(
        feedback.result.outcome,
        AnswerOutcome::IncorrectFinal {
            answer: "ola".into()
        }
    );
    let next = feedback.next_prompt.unwrap();
    assert_eq!(next.word.side_a(), "cat");
    assert_eq!(next.progress.missed_count, 1);

    let feedback = practice.submit_answer(&key(), "gato").await.unwrap();
    assert_eq!(feedback.result.pass, PassEvent::RequeueStarted { words: 1 });
    let next = feedback.next_prompt.unwrap();
    assert_eq!(next.word.side_a(), "hello");
    assert_eq!(next.progress.current_position, 1);
    assert_eq!(next.progress.total_in_pass, 1);
    assert_eq!(next.progress.missed_count, 0);

    let feedback = practice.submit_answer(&key(), "ola").await.unwrap();
    assert_eq!(feedback.result.pass, PassEvent::SessionComplete);
}

#[tokio::test]
async fn operations_without_session_report_no_active_session() {
    let app = app();
    let list = spanish(&app).await;
    let practice = app.practice();

    let err = practice.submit_answer(&key(), "ola").await.unwrap_err();
    assert!(err.is_no_active_session());
    assert!(practice.current_prompt(&key()).await.unwrap_err().is_no_active_session());

    practice.start_session(&key(), list).await.unwrap();
    practice.submit_answer(&key(), "ola").await.unwrap();
    let last = practice.submit_answer(&key(), "gato").await.unwrap();
    assert_eq!(last.result.pass, PassEvent::SessionComplete);

    assert!(practice.progress(&key()).await.unwrap_err().is_no_active_session());
    assert!(practice.current_prompt(&key()).await.unwrap_err().is_no_active_session());
    assert!(practice.submit_answer(&key(), "x").await.unwrap_err().is_no_active_session());
}

#[tokio::test]
async fn deleted_next_word_still_reports_the_answer_and_resume_restarts() {
    let app = app();
    let list = spanish(&app).await;
    let practice = app.practice();
    practice.start_session(&key(), list).await.unwrap();

    let hello = app.wordlists().get_wordlist(list).await.unwrap().words[0].id().to_string();
    let rows = services::parse_word_rows(&[hello.as_str()], &["hello"], &["ola"]);
    app.wordlists().edit_wordlist(list, "Spanish", rows.rows).await.unwrap();

    let feedback = practice.submit_answer(&key(), "ola").await.unwrap();
    assert_eq!(feedback.result.outcome, AnswerOutcome::Correct);
    assert!(feedback.next_prompt.is_none());
    assert!(matches!(
        practice.current_prompt(&key()).await,
        Err(PracticeServiceError::Source(WordSourceError::WordNotFound { .. }))
    ));

    let restarted = practice.start_or_resume(&key(), list).await.unwrap();
    assert_eq!(restarted.word.side_a(), "hello");
    assert_eq!(restarted.progress.current_position, 1);
    assert_eq!(restarted.progress.total_in_pass, 1);

    let feedback = practice.submit_answer(&key(), "ola").await.unwrap();
    assert_eq!(feedback.result.pass, PassEvent::SessionComplete);
}

#[tokio::test]
async fn empty_wordlist_keeps_the_previous_session() {
    let storage = Storage::in_memory();
    let app = AppServices::from_storage(&storage, Clock::fixed(fixed_now()), false);
    let list = spanish(&app).await;
    let empty = storage
        .wordlists
        .insert_new_wordlist(NewWordlistRecord {
            name: "Empty".into(),
            created_at: fixed_now(),
        })
        .await
        .unwrap();
    let practice = app.practice();

    practice.start_session(&key(), list).await.unwrap();
    practice.submit_answer(&key(), "ola").await.unwrap();

    let err = practice.start_session(&key(), empty).await.unwrap_err();
    assert!(matches!(
        err,
        PracticeServiceError::Practice(PracticeError::EmptyWordlist { .. })
    ));
    let prompt = practice.current_prompt(&key()).await.unwrap();
    assert_eq!(prompt.word.side_a(), "cat");

    let err = practice
        .start_session(&key(), WordlistId::new(404))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PracticeServiceError::Source(WordSourceError::WordlistNotFound { .. })
    ));
}

#[tokio::test]
async fn start_or_resume_only_resumes_the_same_list() {
    let app = app();
    let list = spanish(&app).await;
    let other = {
        let rows = services::parse_new_pairs(&["dog"], &["perro"]);
        let drafts: Vec<_> = rows.rows.into_iter().map(|r| r.draft).collect();
        app.wordlists().create_wordlist("Animals", &drafts).await.unwrap()
    };
    let practice = app.practice();

    practice.start_session(&key(), list).await.unwrap();
    practice.submit_answer(&key(), "ola").await.unwrap();

    let resumed = practice.start_or_resume(&key(), list).await.unwrap();
    assert_eq!(resumed.word.side_a(), "cat");

    let switched = practice.start_or_resume(&key(), other).await.unwrap();
    assert_eq!(switched.word.side_a(), "dog");
    assert_eq!(switched.progress.total_in_pass, 1);
}

#[tokio::test]
async fn sessions_are_isolated_per_key_and_can_be_abandoned() {
    let app = app();
    let list = spanish(&app).await;
    let practice = app.practice();
    let other = SessionKey::new("browser-2").unwrap();

    practice.start_session(&key(), list).await.unwrap();
    practice.start_session(&other, list).await.unwrap();
    practice.submit_answer(&key(), "ola").await.unwrap();

    assert_eq!(practice.progress(&key()).await.unwrap().current_position, 2);
    assert_eq!(practice.progress(&other).await.unwrap().current_position, 1);

    assert!(practice.abandon(&key()).await.unwrap());
    assert!(!practice.abandon(&key()).await.unwrap());
    assert_eq!(practice.phase(&other).await.unwrap(), SessionPhase::AwaitingAnswer);
}

#[tokio::test]
async fn non_utf8_answer_counts_as_empty() {
    let app = app();
    let list = spanish(&app).await;
    let practice = app.practice();
    practice.start_session(&key(), list).await.unwrap();

    let feedback = practice
        .submit_answer_bytes(&key(), &[0xff, 0xfe])
        .await
        .unwrap();
    assert!(matches!(
        feedback.result.outcome,
        AnswerOutcome::IncorrectRetry { .. }
    ));

    let feedback = practice.submit_answer_bytes(&key(), b"ola").await.unwrap();
    assert!(feedback.result.outcome.is_correct());
}

#[tokio::test]
async fn sqlite_session_survives_service_restart() {
    let url = "sqlite:file:memdb_practice_restart?mode=memory&cache=shared";
    let first = AppServices::new_sqlite(url, Clock::fixed(fixed_now()), false)
        .await
        .unwrap();
    let list = spanish(&first).await;
    first.practice().start_session(&key(), list).await.unwrap();
    first.practice().submit_answer(&key(), "nope").await.unwrap();

    let second = AppServices::new_sqlite(url, Clock::fixed(fixed_now()), false)
        .await
        .unwrap();
    let prompt = second.practice().current_prompt(&key()).await.unwrap();
    assert_eq!(prompt.word.side_a(), "hello");
    assert!(prompt.is_retry);

    let feedback = second.practice().submit_answer(&key(), "ola").await.unwrap();
    assert!(feedback.result.outcome.is_correct());
    drop(first);
}
