//! Static profile data rendered by the banner and referenced by prompts.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileLink {
    pub label: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub name: &'static str,
    pub handle: &'static str,
    pub title: &'static str,
    pub bio: &'static [&'static str],
    pub email: &'static str,
    pub links: &'static [ProfileLink],
}

pub const PROFILE: Profile = Profile {
    name: "Jordan Avery",
    handle: "javery",
    title: "Software engineer · systems, tooling and the occasional blog post",
    bio: &[
        "I build developer tools and write about distributed systems,",
        "terminals, and the small details that make software pleasant.",
    ],
    email: "hello@javery.dev",
    links: &[
        ProfileLink {
            label: "Web",
            url: "https://javery.dev",
        },
        ProfileLink {
            label: "Blog",
            url: "https://javery.dev/blog",
        },
        ProfileLink {
            label: "GitHub",
            url: "https://github.com/javery",
        },
    ],
};

impl Profile {
    /// Greeting shown once, the first time the chat is opened on this machine.
    pub fn welcome_message(&self) -> String {
        format!(
            "Welcome! Ask me anything about {} and their work. Suggested follow-ups appear after each answer; use ↑/↓ and Enter to pick one.",
            self.name
        )
    }
}
