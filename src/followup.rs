//! Construction of the follow-on task invocation for a matched target.

use crate::config::TaskNames;
use crate::target::GiftOption;
use serde_json::{Value, json};

/// A ready-to-run follow-on flow: the task name plus the override payload
/// selected by the target's gift option.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInvocation {
    pub task: String,
    pub overrides: Option<Value>,
}

/// Build the follow-on invocation for one gift option.
///
/// `All` and `FavoriteOnly` swap the pick step's template set and chain its
/// transitions back through the give step so the flow re-picks until it
/// signals success. `None` reroutes the entry step straight to the decline
/// step.
pub fn invitation(gift_option: GiftOption, tasks: &TaskNames) -> TaskInvocation {
    let overrides = match gift_option {
        GiftOption::All => Some(pick_override(&tasks.any_gift_templates, tasks)),
        GiftOption::FavoriteOnly => Some(pick_override(&tasks.favorite_gift_templates, tasks)),
        GiftOption::None => Some(json!({
            (tasks.entry_step.as_str()): {
                "next": [tasks.decline_step],
            }
        })),
    };

    TaskInvocation {
        task: tasks.follow_up.clone(),
        overrides,
    }
}

fn pick_override(templates: &[String], tasks: &TaskNames) -> Value {
    json!({
        (tasks.pick_step.as_str()): {
            "template": templates,
            "next": [tasks.give_step, tasks.pick_step],
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_overrides_pick_step_with_any_templates() {
        let tasks = TaskNames::default();
        let invocation = invitation(GiftOption::All, &tasks);

        assert_eq!(invocation.task, "invite_selected");
        let overrides = invocation.overrides.unwrap();
        let pick = &overrides["pick_gift"];
        assert_eq!(pick["template"][0], "gifts/any.png");
        assert_eq!(pick["next"][0], "give_gift");
        assert_eq!(pick["next"][1], "pick_gift");
    }

    #[test]
    fn favorite_only_swaps_template_set() {
        let tasks = TaskNames::default();
        let overrides = invitation(GiftOption::FavoriteOnly, &tasks)
            .overrides
            .unwrap();
        assert_eq!(overrides["pick_gift"]["template"][0], "gifts/favorite.png");
    }

    #[test]
    fn none_reroutes_entry_to_decline_without_templates() {
        let tasks = TaskNames::default();
        let overrides = invitation(GiftOption::None, &tasks).overrides.unwrap();

        assert_eq!(overrides["gift_prompt"]["next"][0], "decline_gift");
        assert!(overrides.get("pick_gift").is_none());
    }

    #[test]
    fn custom_step_names_flow_through() {
        let tasks = TaskNames {
            follow_up: "greet".to_string(),
            pick_step: "choose".to_string(),
            give_step: "hand_over".to_string(),
            ..TaskNames::default()
        };
        let invocation = invitation(GiftOption::All, &tasks);
        assert_eq!(invocation.task, "greet");
        assert!(invocation.overrides.unwrap().get("choose").is_some());
    }
}
