use super::*;

impl InactivityReaperService {
    pub(super) async fn remediate(
        &self,
        action_kind: ActionKind,
        dry_run: bool,
        account: &AccountSnapshot,
        inactive_for: TimeDelta,
        summary: &mut RunSummary,
    ) {
        info!(
            account_id = %account.id(),
            display_name = account.display_name(),
            last_activity = ?account.last_activity_at(),
            inactive_days = inactive_for.num_days(),
            "account is inactive"
        );

        if dry_run {
            warn!(
                account_id = %account.id(),
                display_name = account.display_name(),
                action = action_kind.verb(),
                "dry run: account would be actioned, directory left unchanged"
            );
            summary.record_actioned();
            return;
        }

        let outcome = match action_kind {
            ActionKind::Delete => self.directory.delete_account(account.id()).await,
            ActionKind::Disable => self.directory.disable_account(account.id()).await,
        };

        match outcome {
            Ok(()) => {
                match action_kind {
                    ActionKind::Delete => warn!(
                        account_id = %account.id(),
                        display_name = account.display_name(),
                        "deleted account due to inactivity"
                    ),
                    ActionKind::Disable => warn!(
                        account_id = %account.id(),
                        display_name = account.display_name(),
                        "disabled account due to inactivity"
                    ),
                }
                summary.record_actioned();
            }
            Err(error) => {
                error!(
                    account_id = %account.id(),
                    display_name = account.display_name(),
                    action = action_kind.verb(),
                    error = %error,
                    "failed to action inactive account"
                );
                summary.record_failure(
                    account.id().clone(),
                    AccountFailureStage::Action(action_kind),
                    error.to_string(),
                );
            }
        }
    }
}
