use crate::domain::UserId;

// ============== Authorization ==============

/// Only the configured operator may drive the bot.
pub fn is_authorized(user_id: Option<UserId>, operator: UserId) -> bool {
    let Some(user_id) = user_id else {
        return false;
    };
    user_id == operator
}
