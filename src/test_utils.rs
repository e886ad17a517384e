pub mod fixtures {
    use chrono::{DateTime, Duration, Utc};

    use crate::models::domain::{Quiz, User, UserRole};

    /// Creates a standard active user
    pub fn test_user() -> User {
        test_user_with_email("jane@example.com")
    }

    pub fn test_user_with_email(email: &str) -> User {
        User::new("Jane", email, "password123", UserRole::User, "SYSTEM", Utc::now())
    }

    /// A quiz whose 30-minute window opened five minutes before `now`.
    pub fn due_quiz(title: &str, now: DateTime<Utc>) -> Quiz {
        Quiz::new(
            title,
            "D",
            now - Duration::minutes(5),
            now + Duration::minutes(25),
            "SYSTEM",
            now - Duration::minutes(10),
        )
    }

    pub fn active_quiz() -> Quiz {
        let now = Utc::now();
        let mut quiz = due_quiz("Active", now);
        quiz.activate("SCHEDULER", now);
        quiz
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }
}
