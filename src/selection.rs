use crate::api::TeamId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Home,
    Away,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Home => "Mandante",
            Role::Away => "Visitante",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Empty,
    OneSelected,
    TwoSelectedValid,
    TwoSelectedInvalid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    home: Option<TeamId>,
    away: Option<TeamId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn home(&self) -> Option<TeamId> {
        self.home
    }

    pub fn away(&self) -> Option<TeamId> {
        self.away
    }

    pub fn get(&self, role: Role) -> Option<TeamId> {
        match role {
            Role::Home => self.home,
            Role::Away => self.away,
        }
    }

    /// Gallery pick. Home takes any team while empty; away only takes a team that differs
    /// from home. Returns the role that was filled, or `None` if the pick was rejected.
    pub fn pick(&mut self, team: TeamId) -> Option<Role> {
        if self.home.is_none() {
            self.home = Some(team);
            return Some(Role::Home);
        }
        if self.away.is_none() && self.home != Some(team) {
            self.away = Some(team);
            return Some(Role::Away);
        }
        None
    }

    /// Direct assignment from a role's own selector. Unlike `pick` this may leave both
    /// roles on the same team; `can_predict` then stays false.
    pub fn assign(&mut self, role: Role, team: Option<TeamId>) {
        match role {
            Role::Home => self.home = team,
            Role::Away => self.away = team,
        }
    }

    pub fn clear(&mut self, role: Role) {
        self.assign(role, None);
    }

    pub fn reset(&mut self) {
        self.home = None;
        self.away = None;
    }

    pub fn phase(&self) -> SelectionPhase {
        match (self.home, self.away) {
            (None, None) => SelectionPhase::Empty,
            (Some(_), None) | (None, Some(_)) => SelectionPhase::OneSelected,
            (Some(h), Some(a)) if h == a => SelectionPhase::TwoSelectedInvalid,
            (Some(_), Some(_)) => SelectionPhase::TwoSelectedValid,
        }
    }

    pub fn can_predict(&self) -> bool {
        self.phase() == SelectionPhase::TwoSelectedValid
    }

    pub fn pair(&self) -> Option<(TeamId, TeamId)> {
        match (self.home, self.away) {
            (Some(h), Some(a)) if h != a => Some((h, a)),
            _ => None,
        }
    }

    pub fn retain(&mut self, exists: impl Fn(TeamId) -> bool) {
        if self.home.is_some_and(|id| !exists(id)) {
            self.home = None;
        }
        if self.away.is_some_and(|id| !exists(id)) {
            self.away = None;
        }
    }
}
