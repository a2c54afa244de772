use anyhow::anyhow;
use clap::Parser;
use curalink::cli::{Cli, Commands, FavoriteAction, PatientOpts};
use curalink::config::Config;
use curalink::format::{format_matches, format_trial_brief};
use curalink::search::{CollaboratorFilter, ExpertFilter, ForumFilter, PublicationFilter, TrialFilter};
use curalink::server::MatchServer;
use curalink::service::CuraLink;
use curalink::store::DynStore;
use curalink::tools::{
    ListFavoritesRequest, MatchCollaboratorsRequest, MatchExpertsRequest, MatchForumPostsRequest,
    MatchPublicationsRequest, NormalizeConditionRequest, NormalizeLocationRequest, PatientArgs,
    ToggleFavoriteRequest, handle_list_favorites, handle_match_collaborators, handle_match_experts,
    handle_match_forum_posts, handle_match_publications, handle_normalize_condition,
    handle_normalize_location, handle_toggle_favorite, resolve_patient,
};
use curalink::types::{PatientProfile, Role};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays free for the MCP protocol
    curalink::tracing::init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    config.offline |= cli.offline;
    let engine = CuraLink::from_config(&config)?;

    match cli.command {
        Commands::Serve => serve(engine).await,
        Commands::Condition { input } => {
            let request = NormalizeConditionRequest {
                input: input.join(" "),
            };
            print!("{}", handle_normalize_condition(&request));
            Ok(())
        }
        Commands::Location { input } => {
            let request = NormalizeLocationRequest {
                input: input.join(" "),
            };
            print!("{}", handle_normalize_location(&request));
            Ok(())
        }
        Commands::Trials {
            patient,
            search,
            phase,
            status,
            site,
            limit,
            brief,
        } => {
            let patient = patient_args(&engine, patient).await?;
            let profile = resolve_patient(&engine, &patient).map_err(|e| anyhow!(e))?;
            let filter = TrialFilter {
                search,
                phase,
                status,
                location: site,
            };
            let mut trials = engine.match_trials(&profile, &filter).await;
            trials.truncate(limit);

            let favorites = engine.state().favorites(Role::Patient);
            println!("{}", format_matches(&trials, Some(&favorites)));
            if brief {
                for scored in &trials {
                    let summary = engine.trial_brief(&scored.item, &profile);
                    println!("\n{}", format_trial_brief(&scored.item, &summary));
                }
            }
            Ok(())
        }
        Commands::Experts {
            patient,
            search,
            specialty,
            site,
            available_only,
            include_external,
            limit,
        } => {
            let request = MatchExpertsRequest {
                patient: patient_args(&engine, patient).await?,
                filter: ExpertFilter {
                    search,
                    specialty,
                    location: site,
                    available_only,
                },
                include_external,
                limit: Some(limit),
            };
            print_result(handle_match_experts(&engine, request).await)
        }
        Commands::Publications {
            patient,
            search,
            journal,
            year,
            limit,
        } => {
            let request = MatchPublicationsRequest {
                patient: patient_args(&engine, patient).await?,
                filter: PublicationFilter {
                    search,
                    journal,
                    year,
                },
                limit: Some(limit),
            };
            print_result(handle_match_publications(&engine, request).await)
        }
        Commands::Forums {
            patient,
            category,
            sort,
        } => {
            let request = MatchForumPostsRequest {
                patient: patient_args(&engine, patient).await?,
                filter: ForumFilter { category },
                sort,
            };
            print_result(handle_match_forum_posts(&engine, &request))
        }
        Commands::Collaborators {
            specialties,
            interests,
            location,
            search,
            only_specialty,
            limit,
        } => {
            let request = MatchCollaboratorsRequest {
                specialties: (!specialties.is_empty()).then_some(specialties),
                research_interests: (!interests.is_empty()).then_some(interests),
                location,
                filter: CollaboratorFilter {
                    search,
                    specialty: only_specialty,
                },
                limit: Some(limit),
            };
            print_result(handle_match_collaborators(&engine, request).await)
        }
        Commands::Favorite { action } => match action {
            FavoriteAction::Toggle { role, kind, id } => {
                let request = ToggleFavoriteRequest { role, kind, id };
                print_result(handle_toggle_favorite(&engine, &request))
            }
            FavoriteAction::List { role } => {
                println!("{}", handle_list_favorites(&engine, &ListFavoritesRequest { role }));
                Ok(())
            }
        },
    }
}

async fn serve(engine: CuraLink<DynStore>) -> anyhow::Result<()> {
    tracing::info!("Starting curalink MCP server (backend {})", engine.api().base_url());

    let server = MatchServer::new(engine);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}

/// Convert CLI patient options, saving them as the profile when asked.
async fn patient_args(engine: &CuraLink<DynStore>, opts: PatientOpts) -> anyhow::Result<PatientArgs> {
    if opts.save {
        let saved = engine.state().patient_profile().unwrap_or_default();
        let profile = PatientProfile {
            condition: opts.condition.clone().unwrap_or(saved.condition),
            location: opts.location.clone().unwrap_or(saved.location),
            additional_conditions: saved.additional_conditions,
        };
        engine.save_patient_profile(&profile).await?;
        tracing::info!("Saved patient profile");
    }
    Ok(PatientArgs {
        condition: opts.condition,
        location: opts.location,
    })
}

fn print_result(result: Result<String, String>) -> anyhow::Result<()> {
    let output = result.map_err(|e| anyhow!(e))?;
    println!("{}", output);
    Ok(())
}
