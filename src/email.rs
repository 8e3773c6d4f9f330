use anyhow::bail;

pub struct BookingConfirmation {
    pub student_name: String,
    pub student_email: String,
    pub provider_name: String,
    pub scheduled_start: String,
    pub scheduled_end: String,
    pub price_cents: i64,
}

/// Hand a booking confirmation to the mail transport. Delivery is
/// fire-and-forget: callers log a failure and carry on, the booking flow
/// never fails because of mail.
pub fn send_booking_confirmation(mail: &BookingConfirmation) -> anyhow::Result<()> {
    if mail.student_email.is_empty() {
        bail!("Recipient has no email address");
    }

    // Dev transport: the formatted mail goes to the process log. The
    // hosted mail function takes over in deployment.
    log::info!(
        "email to {}: your session with {} is confirmed ({} - {}, ${}.{:02})",
        mail.student_email,
        mail.provider_name,
        mail.scheduled_start,
        mail.scheduled_end,
        mail.price_cents / 100,
        mail.price_cents % 100,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(email: &str) -> BookingConfirmation {
        BookingConfirmation {
            student_name: "Ada".to_string(),
            student_email: email.to_string(),
            provider_name: "Grace".to_string(),
            scheduled_start: "2024-05-06T10:00:00+00:00".to_string(),
            scheduled_end: "2024-05-06T11:00:00+00:00".to_string(),
            price_cents: 6_000,
        }
    }

    #[test]
    fn requires_a_recipient() {
        assert!(send_booking_confirmation(&mail("")).is_err());
        assert!(send_booking_confirmation(&mail("ada@example.com")).is_ok());
    }
}
