/// Delivery seam for outbound notification mail. The real transport is an
/// external collaborator; this stand-in always succeeds. Callers record
/// `failed` when this returns an error, so wiring in a real mailer needs no
/// change on their side.
#[tracing::instrument]
pub async fn deliver(recipients: &[String], subject: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Delivering \"{subject}\" to {} recipient(s)",
        recipients.len()
    );

    Ok(())
}
