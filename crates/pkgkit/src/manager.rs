//! Package manager descriptors.
//!
//! [`ManagerKind`] is the single source of truth for how each supported
//! package manager is queried and driven: which binary it needs, how to ask
//! whether a package is installed or available, and how to install one.

use crate::env::CommandSpec;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an installed-package query reports its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstalledCheck {
    /// Exit status 0 means installed
    ExitStatus,
    /// Installed when a stdout line starts with the package name
    ListsName,
    /// Installed when stdout starts with the given status abbreviation
    StatusPrefix(&'static str),
}

/// A supported native package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
    /// yay - AUR helper, wraps pacman and escalates on its own
    Yay,
    /// Pacman - Arch Linux family
    Pacman,
    /// APT - Debian/Ubuntu family
    Apt,
    /// DNF - Fedora/RHEL family
    Dnf,
    /// YUM - older RHEL/CentOS
    Yum,
    /// Zypper - openSUSE
    Zypper,
    /// Homebrew - macOS and Linux
    Brew,
    /// MacPorts
    Port,
    /// pkg - FreeBSD
    Pkg,
}

impl ManagerKind {
    /// Detection order: the first manager whose binary exists wins.
    pub const DETECTION_ORDER: [ManagerKind; 9] = [
        ManagerKind::Yay,
        ManagerKind::Pacman,
        ManagerKind::Apt,
        ManagerKind::Dnf,
        ManagerKind::Yum,
        ManagerKind::Zypper,
        ManagerKind::Brew,
        ManagerKind::Port,
        ManagerKind::Pkg,
    ];

    /// Lowercase identifier, as accepted by [`FromStr`].
    pub fn id(&self) -> &'static str {
        match self {
            Self::Yay => "yay",
            Self::Pacman => "pacman",
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Zypper => "zypper",
            Self::Brew => "brew",
            Self::Port => "port",
            Self::Pkg => "pkg",
        }
    }

    /// Get a human-readable name for this package manager.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Yay => "yay (AUR)",
            Self::Pacman => "Pacman",
            Self::Apt => "APT",
            Self::Dnf => "DNF",
            Self::Yum => "YUM",
            Self::Zypper => "Zypper",
            Self::Brew => "Homebrew",
            Self::Port => "MacPorts",
            Self::Pkg => "pkg",
        }
    }

    /// Binary whose presence on `PATH` signals this manager.
    pub fn binary(&self) -> &'static str {
        self.id()
    }

    /// Whether installs go through `sudo`.
    pub fn requires_sudo(&self) -> bool {
        !matches!(self, Self::Yay | Self::Brew)
    }

    /// How [`ManagerKind::installed_query`] output is interpreted.
    ///
    /// dpkg keeps removed-but-not-purged packages in its database, so APT
    /// needs the `ii` (install ok installed) status rather than an exit code.
    pub fn installed_check(&self) -> InstalledCheck {
        match self {
            Self::Apt => InstalledCheck::StatusPrefix("ii"),
            Self::Port => InstalledCheck::ListsName,
            _ => InstalledCheck::ExitStatus,
        }
    }

    /// Command that checks the local package database for `name`.
    pub fn installed_query(&self, name: &str) -> CommandSpec {
        match self {
            Self::Yay | Self::Pacman => CommandSpec::new(self.binary()).arg("-Q").arg(name),
            Self::Apt => CommandSpec::new("dpkg-query").args(["-W", "-f=${db:Status-Abbrev}", name]),
            Self::Dnf | Self::Yum | Self::Zypper => CommandSpec::new("rpm").args(["-q", name]),
            Self::Brew => CommandSpec::new("brew").args(["list", "--versions", name]),
            Self::Port => CommandSpec::new("port").args(["-q", "installed", name]),
            Self::Pkg => CommandSpec::new("pkg").args(["info", "-e", name]),
        }
    }

    /// Command that checks remote repositories for `name`, if the manager has one.
    pub fn availability_query(&self, name: &str) -> Option<CommandSpec> {
        match self {
            Self::Yay | Self::Pacman => Some(CommandSpec::new(self.binary()).arg("-Si").arg(name)),
            Self::Apt => Some(CommandSpec::new("apt-cache").args(["show", name])),
            Self::Dnf | Self::Yum => Some(CommandSpec::new(self.binary()).args(["-q", "info", name])),
            Self::Brew => Some(CommandSpec::new("brew").args(["info", name])),
            Self::Zypper | Self::Port | Self::Pkg => None,
        }
    }

    /// Whether the install command ends option parsing at `--`.
    pub fn accepts_option_terminator(&self) -> bool {
        !matches!(self, Self::Port)
    }

    /// Command that installs `name` without prompting.
    ///
    /// The name follows `--` where the manager accepts it, so an entry that
    /// starts with a dash is never read as an option.
    pub fn install_command(&self, name: &str) -> CommandSpec {
        let base: &[&str] = match self {
            Self::Yay => &["yay", "-S", "--noconfirm", "--needed"],
            Self::Pacman => &["pacman", "-S", "--noconfirm", "--needed"],
            Self::Apt => &["apt-get", "install", "-y"],
            Self::Dnf => &["dnf", "install", "-y"],
            Self::Yum => &["yum", "install", "-y"],
            Self::Zypper => &["zypper", "--non-interactive", "install"],
            Self::Brew => &["brew", "install"],
            Self::Port => &["port", "-N", "install"],
            Self::Pkg => &["pkg", "install", "-y"],
        };

        let spec = if self.requires_sudo() {
            CommandSpec::new("sudo").args(base.iter().copied())
        } else {
            CommandSpec::new(base[0]).args(base[1..].iter().copied())
        };
        let spec = if self.accepts_option_terminator() {
            spec.arg("--")
        } else {
            spec
        };
        spec.arg(name)
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ManagerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::DETECTION_ORDER
            .into_iter()
            .find(|kind| kind.id() == wanted)
            .ok_or_else(|| Error::UnknownManager(s.to_string()))
    }
}
