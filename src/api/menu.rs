//! Main menu: commands, labels and static texts

use crate::db::Client;
use std::fmt::Write;

/// Reply-keyboard rows shown outside of a flow
pub const MAIN_MENU: [[&str; 2]; 2] = [
    ["📝 Ajouter un client", "📋 Liste des clients"],
    ["📅 Faire une réservation", "🗑️ Supprimer un client"],
];

pub const WELCOME: &str = "Bienvenue sur le bot de conciergerie ! \
Utilisez le menu ci-dessous pour naviguer dans les options.";

pub const HELP: &str = "💡 Aide et Instructions\n\n\
Commandes disponibles :\n\
/start - Afficher le menu principal\n\
/help - Afficher ce message d'aide\n\
/add_client - Ajouter un client\n\
/clients - Liste des clients\n\
/reserve - Faire une réservation\n\
/delete_client - Supprimer un client\n\n\
Pour utiliser le bot :\n\
1. Ajoutez d'abord un client\n\
2. Faites des réservations pour ce client\n\n\
Pour annuler une opération en cours,\n\
utilisez la commande /cancel";

pub const NO_CLIENTS: &str = "Aucun client n'est enregistré pour le moment.";

pub const NO_CLIENTS_TO_SELECT: &str =
    "Aucun client n'est enregistré. Veuillez d'abord ajouter un client.";

pub const NOTHING_TO_CANCEL: &str = "Aucune opération en cours.";

/// A main-menu action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Start,
    Help,
    AddClient,
    ListClients,
    Reserve,
    DeleteClient,
    Cancel,
}

impl MenuCommand {
    /// Recognize a slash command or a menu label
    pub fn parse(text: &str) -> Option<Self> {
        let command = match text.trim() {
            "/start" | "🔄 Menu principal" => MenuCommand::Start,
            "/help" => MenuCommand::Help,
            "/add_client" | "📝 Ajouter un client" => MenuCommand::AddClient,
            "/clients" | "📋 Liste des clients" => MenuCommand::ListClients,
            "/reserve" | "📅 Faire une réservation" | "📅 Réservation" => MenuCommand::Reserve,
            "/delete_client" | "🗑️ Supprimer un client" | "🗑️ Supprimer client" => {
                MenuCommand::DeleteClient
            }
            "/cancel" => MenuCommand::Cancel,
            _ => return None,
        };
        Some(command)
    }
}

pub fn main_menu() -> Vec<Vec<String>> {
    MAIN_MENU
        .iter()
        .map(|row| row.iter().map(|label| (*label).to_string()).collect())
        .collect()
}

/// Client directory as shown by the list command
pub fn client_listing(clients: &[Client]) -> String {
    if clients.is_empty() {
        return NO_CLIENTS.to_string();
    }
    let mut out = String::from("Liste des clients enregistrés :\n\n");
    for client in clients {
        let _ = write!(
            out,
            "📌 {}\n📞 {}\n📧 {}\n\n",
            client.display_name(),
            client.phone,
            client.email
        );
    }
    out.truncate(out.trim_end().len());
    out
}
