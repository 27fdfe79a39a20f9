//! The fixed checkup questionnaire
//!
//! Question keys must match the backend's scoring tables; answers are sent as
//! plain strings (`yes`, `partial`, `no`).

use std::collections::BTreeMap;

use crate::core::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum AnswerOption {
    #[display("yes")]
    Yes,
    #[display("partial")]
    Partial,
    #[display("no")]
    No,
}

impl AnswerOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerOption::Yes => "yes",
            AnswerOption::Partial => "partial",
            AnswerOption::No => "no",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub key: &'static str,
    pub label: &'static str,
    pub options: &'static [AnswerOption],
}

impl Question {
    pub fn allows(&self, answer: &str) -> bool {
        self.options.iter().any(|option| option.as_str() == answer)
    }
}

const YES_PARTIAL_NO: &[AnswerOption] =
    &[AnswerOption::Yes, AnswerOption::Partial, AnswerOption::No];
const YES_NO: &[AnswerOption] = &[AnswerOption::Yes, AnswerOption::No];

pub const CHECKUP_QUESTIONS: &[Question] = &[
    Question {
        key: "mfa_all",
        label: "Do all staff use 2-step login (MFA) for work accounts?",
        options: YES_PARTIAL_NO,
    },
    Question {
        key: "admin_protection",
        label: "Are admin accounts protected (separate accounts, MFA)?",
        options: YES_NO,
    },
    Question {
        key: "shared_logins",
        label: "Do you avoid shared logins for critical systems (email, payments, etc.)?",
        options: YES_NO,
    },
    Question {
        key: "mfa_payments",
        label: "Is MFA enabled on payment platforms (Stripe, Square, QuickBooks)?",
        options: YES_NO,
    },
    Question {
        key: "email_forwarding",
        label: "Is automatic email forwarding restricted or monitored?",
        options: YES_PARTIAL_NO,
    },
    Question {
        key: "file_sharing_limited",
        label: "Is file sharing limited to your organization (not public)?",
        options: YES_PARTIAL_NO,
    },
    Question {
        key: "access_review",
        label: "Do you review who has access to what at least quarterly?",
        options: YES_NO,
    },
    Question {
        key: "independent_backups",
        label: "Do you have backups outside your main SaaS (e.g. Backupify, Spanning)?",
        options: YES_PARTIAL_NO,
    },
    Question {
        key: "restore_tested",
        label: "Have you tested a restore in the last 6 months?",
        options: YES_NO,
    },
    Question {
        key: "phishing_training",
        label: "Do staff get phishing awareness training (e.g. quarterly)?",
        options: YES_NO,
    },
    Question {
        key: "incident_plan",
        label: "Do you have a simple incident response plan (who to call, what to do first)?",
        options: YES_NO,
    },
    Question {
        key: "domain_email_protection",
        label: "Do you have SPF, DKIM, and DMARC set up for your domain?",
        options: YES_NO,
    },
];

pub fn question(key: &str) -> Option<&'static Question> {
    CHECKUP_QUESTIONS.iter().find(|q| q.key == key)
}

/// Reject unknown keys and answers a question does not offer.
///
/// Unanswered questions are allowed; the backend scores what it gets.
pub fn validate_answers(answers: &BTreeMap<String, String>) -> Result<(), ApiError> {
    for (key, answer) in answers {
        let question =
            question(key).ok_or_else(|| ApiError::api(format!("Unknown question: {}", key)))?;
        if !question.allows(answer) {
            return Err(ApiError::api(format!(
                "Invalid answer '{}' for question: {}",
                answer, question.label
            )));
        }
    }
    Ok(())
}

/// (answered, total) for the wizard's progress indicator.
pub fn progress(answers: &BTreeMap<String, String>) -> (usize, usize) {
    let answered = CHECKUP_QUESTIONS
        .iter()
        .filter(|q| answers.get(q.key).is_some_and(|a| q.allows(a)))
        .count();
    (answered, CHECKUP_QUESTIONS.len())
}
