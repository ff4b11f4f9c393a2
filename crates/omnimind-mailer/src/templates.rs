//! HTML email templates with `{{var}}` substitution.

use std::collections::HashMap;

/// A named email template: a subject line and an HTML body, both of which
/// may contain `{{var}}` placeholders.
#[derive(Debug, Clone)]
pub struct EmailTemplate {
    pub subject: &'static str,
    pub html: &'static str,
}

impl EmailTemplate {
    /// Render the subject and body, substituting every `{{key}}` with its
    /// value. Placeholders without a provided value render as empty strings.
    pub fn render(&self, vars: &HashMap<&str, String>) -> (String, String) {
        (substitute(self.subject, vars), substitute(self.html, vars))
    }
}

/// Replace `{{key}}` placeholders; unknown keys become empty.
fn substitute(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                if let Some(value) = vars.get(key) {
                    out.push_str(value);
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Look up a built-in template by name.
pub fn by_name(name: &str) -> Option<&'static EmailTemplate> {
    match name {
        "welcome" => Some(&WELCOME),
        "task_reminder" => Some(&TASK_REMINDER),
        "daily_digest" => Some(&DAILY_DIGEST),
        _ => None,
    }
}

/// Sent once after registration.
pub static WELCOME: EmailTemplate = EmailTemplate {
    subject: "Welcome to OmniMind!",
    html: r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
    .container { max-width: 600px; margin: 0 auto; padding: 20px; }
    .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 30px; color: white; text-align: center; border-radius: 10px 10px 0 0; }
    .content { padding: 30px; background: #f9fafb; border-radius: 0 0 10px 10px; }
    .button { display: inline-block; padding: 12px 24px; background: #3b82f6; color: white; text-decoration: none; border-radius: 6px; font-weight: bold; }
    .footer { text-align: center; margin-top: 30px; color: #6b7280; font-size: 14px; }
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Welcome to OmniMind!</h1>
      <p>Your AI-powered productivity assistant</p>
    </div>
    <div class="content">
      <h2>Hello {{name}},</h2>
      <p>Thank you for joining OmniMind! We're excited to help you boost your productivity with AI-powered assistance.</p>
      <h3>Getting Started:</h3>
      <ol>
        <li><strong>Connect your accounts:</strong> Link your email and calendar for automatic task extraction</li>
        <li><strong>Set up your first project:</strong> Organize your work in one place</li>
        <li><strong>Enable notifications:</strong> Stay on top of important deadlines</li>
      </ol>
      <div style="text-align: center; margin: 30px 0;">
        <a href="{{dashboardUrl}}" class="button">Go to Dashboard</a>
      </div>
      <p>Best regards,<br>The OmniMind Team</p>
    </div>
    <div class="footer">
      <p>© OmniMind. All rights reserved.</p>
    </div>
  </div>
</body>
</html>"#,
};

/// Reminder for a single upcoming task.
pub static TASK_REMINDER: EmailTemplate = EmailTemplate {
    subject: "Task Reminder: {{taskTitle}}",
    html: r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
    .container { max-width: 600px; margin: 0 auto; padding: 20px; }
    .header { background: linear-gradient(135deg, #f59e0b 0%, #d97706 100%); padding: 20px; color: white; text-align: center; border-radius: 10px 10px 0 0; }
    .content { padding: 25px; background: #fff7ed; border-radius: 0 0 10px 10px; }
    .task-card { background: white; border-left: 4px solid #f59e0b; padding: 15px; margin: 15px 0; border-radius: 6px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
    .button { display: inline-block; padding: 10px 20px; background: #3b82f6; color: white; text-decoration: none; border-radius: 6px; font-weight: bold; }
    .footer { text-align: center; margin-top: 25px; color: #6b7280; font-size: 14px; }
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h2>⏰ Task Reminder</h2>
    </div>
    <div class="content">
      <h3>Hello {{name}},</h3>
      <p>This is a reminder for your upcoming task:</p>
      <div class="task-card">
        <h4 style="margin: 0 0 10px 0;">{{taskTitle}}</h4>
        <p style="margin: 0 0 10px 0; color: #6b7280;">{{taskDescription}}</p>
        <div style="display: flex; justify-content: space-between; font-size: 14px;">
          <span><strong>Due:</strong> {{dueDate}}</span>
          <span><strong>Priority:</strong> {{taskPriority}}</span>
        </div>
      </div>
      <div style="text-align: center; margin: 25px 0;">
        <a href="{{taskUrl}}" class="button">View Task</a>
      </div>
      <p>Need to reschedule? You can update the due date in the dashboard.</p>
      <p>Best regards,<br>The OmniMind Team</p>
    </div>
    <div class="footer">
      <p>Manage your notification settings <a href="{{settingsUrl}}">here</a></p>
      <p>© OmniMind. All rights reserved.</p>
    </div>
  </div>
</body>
</html>"#,
};

/// Morning digest with task statistics.
pub static DAILY_DIGEST: EmailTemplate = EmailTemplate {
    subject: "Your Daily Digest - {{date}}",
    html: r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
    .container { max-width: 600px; margin: 0 auto; padding: 20px; }
    .header { background: linear-gradient(135deg, #3b82f6 0%, #1d4ed8 100%); padding: 25px; color: white; text-align: center; border-radius: 10px 10px 0 0; }
    .content { padding: 25px; background: #f0f9ff; border-radius: 0 0 10px 10px; }
    .stats-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 15px; margin: 20px 0; }
    .stat-card { background: white; padding: 15px; border-radius: 8px; text-align: center; }
    .stat-number { font-size: 24px; font-weight: bold; }
    .stat-label { font-size: 14px; color: #6b7280; }
    .button { display: inline-block; padding: 10px 20px; background: #3b82f6; color: white; text-decoration: none; border-radius: 6px; font-weight: bold; }
    .footer { text-align: center; margin-top: 25px; color: #6b7280; font-size: 14px; }
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h2>📊 Your Daily Digest</h2>
      <p>{{date}} | {{dayName}}</p>
    </div>
    <div class="content">
      <h3>Good morning, {{name}}!</h3>
      <p>Here's your productivity overview for today:</p>
      <div class="stats-grid">
        <div class="stat-card">
          <div class="stat-number">{{totalTasks}}</div>
          <div class="stat-label">Total Tasks</div>
        </div>
        <div class="stat-card">
          <div class="stat-number">{{completedTasks}}</div>
          <div class="stat-label">Completed</div>
        </div>
        <div class="stat-card">
          <div class="stat-number">{{overdueTasks}}</div>
          <div class="stat-label">Overdue</div>
        </div>
        <div class="stat-card">
          <div class="stat-number">{{dueTodayTasks}}</div>
          <div class="stat-label">Due Today</div>
        </div>
      </div>
      <div style="text-align: center; margin: 25px 0;">
        <a href="{{dashboardUrl}}" class="button">Open Dashboard</a>
      </div>
      <p>Have a productive day!<br>The OmniMind Team</p>
    </div>
    <div class="footer">
      <p>© OmniMind. All rights reserved.</p>
    </div>
  </div>
</body>
</html>"#,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_substitute_replaces_all_occurrences() {
        let out = substitute("Hi {{name}}, bye {{name}}", &vars(&[("name", "Ada")]));
        assert_eq!(out, "Hi Ada, bye Ada");
    }

    #[test]
    fn test_substitute_unknown_key_renders_empty() {
        let out = substitute("Hello {{missing}}!", &HashMap::new());
        assert_eq!(out, "Hello !");
    }

    #[test]
    fn test_substitute_unterminated_placeholder_kept() {
        let out = substitute("broken {{name", &vars(&[("name", "Ada")]));
        assert_eq!(out, "broken {{name");
    }

    #[test]
    fn test_welcome_render() {
        let (subject, html) = WELCOME.render(&vars(&[
            ("name", "Ada"),
            ("dashboardUrl", "https://app.example/dashboard"),
        ]));
        assert_eq!(subject, "Welcome to OmniMind!");
        assert!(html.contains("Hello Ada,"));
        assert!(html.contains("https://app.example/dashboard"));
        assert!(!html.contains("{{name}}"));
    }

    #[test]
    fn test_task_reminder_subject_substitution() {
        let (subject, html) = TASK_REMINDER.render(&vars(&[
            ("name", "Ada"),
            ("taskTitle", "Write report"),
            ("taskPriority", "high"),
            ("dueDate", "2026-08-10"),
        ]));
        assert_eq!(subject, "Task Reminder: Write report");
        assert!(html.contains("Write report"));
        assert!(html.contains("high"));
    }

    #[test]
    fn test_daily_digest_stats() {
        let (_, html) = DAILY_DIGEST.render(&vars(&[
            ("name", "Ada"),
            ("totalTasks", "12"),
            ("completedTasks", "5"),
            ("overdueTasks", "2"),
            ("dueTodayTasks", "3"),
        ]));
        assert!(html.contains(">12<"));
        assert!(html.contains(">5<"));
    }

    #[test]
    fn test_by_name_lookup() {
        assert!(by_name("welcome").is_some());
        assert!(by_name("task_reminder").is_some());
        assert!(by_name("daily_digest").is_some());
        assert!(by_name("nonexistent").is_none());
    }
}
