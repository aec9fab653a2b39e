use std::collections::HashMap;
use std::time::Duration;

use iced::keyboard::{self, key::Named, Key};
use iced::task;
use iced::widget::image::Handle;
use iced::widget::{column, horizontal_space, stack};
use iced::{event, mouse, window, Element, Event, Length, Subscription, Task, Theme};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

// Declare the application modules
mod api;
mod config;
mod error;
mod media;
mod playback;
mod state;
mod ui;

use api::types::SignupRequest;
use api::{ApiClient, InteractionsFetch, UploadEvent};
use config::Config;
use error::ApiError;
use media::thumbnail::make_thumbnail;
use playback::RodioSink;
use state::audio::{AudioController, AudioSink};
use state::auth::{LoginForm, Registration, SignupField, SignupForm};
use state::data::{Comment, FileInfo, LikeState, Letter, PickedFile, User};
use state::gallery::{GalleryState, DELETE_NOTICE_DURATION};
use state::interactions::{CollapseTicket, PhotoInteractions, AUTO_COLLAPSE_DELAY, NOTICE_DURATION};
use state::letter::LetterState;
use state::menu::MenuState;
use state::route::{resolve, Route, View};
use state::session::{AuthForm, Session, SessionStore};
use state::upload::{BatchRejection, BatchSettled, UploadBoard, UploadKind, NAVIGATE_DELAY};

/// Decoded images of one gallery photo
#[derive(Debug, Clone)]
pub struct PhotoImages {
    /// Downscaled RGBA pixels for the grid
    pub thumbnail: Handle,
    /// Original encoded bytes for the lightbox
    pub full: Handle,
}

/// The gallery page and the images fetched for it
struct GalleryScreen {
    state: GalleryState,
    images: HashMap<String, PhotoImages>,
}

/// Page-specific state of the mounted view
enum Screen {
    Login(LoginForm),
    Signup(SignupForm),
    Home,
    Gallery(GalleryScreen),
    Upload(UploadBoard),
    Letter(LetterState),
}

/// The view currently on screen, plus every task it started.
///
/// Dropping a `Mounted` aborts its tasks, so replacing it is an unmount.
struct Mounted {
    view: View,
    screen: Screen,
    tasks: Vec<task::Handle>,
}

impl Mounted {
    fn new(view: View) -> Self {
        let screen = match view {
            View::Login => Screen::Login(LoginForm::default()),
            View::Signup => Screen::Signup(SignupForm::default()),
            View::Home => Screen::Home,
            View::Gallery => Screen::Gallery(GalleryScreen {
                state: GalleryState::new(),
                images: HashMap::new(),
            }),
            View::UploadPhoto => Screen::Upload(UploadBoard::new(UploadKind::Photo)),
            View::UploadMusic => Screen::Upload(UploadBoard::new(UploadKind::Music)),
            View::Message => Screen::Letter(LetterState::Loading),
        };

        Self {
            view,
            screen,
            tasks: Vec::new(),
        }
    }
}

/// Main application state
struct MemoryLane {
    api: ApiClient,
    session: Session,
    /// Background music, shared by every page
    audio: AudioController<RodioSink>,
    route: Route,
    mounted: Mounted,
    /// Profile menu of pages other than the gallery
    menus: MenuState,
    /// Decoded profile picture of the logged-in user
    avatar: Option<Handle>,
    /// Set by a successful photo upload, taken by the next gallery mount
    refresh_requested: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation & session
    Navigate(Route),
    ShowForm(AuthForm),
    Logout,
    /// Profile picture fetched for the named user
    AvatarLoaded(String, Result<Handle, ApiError>),

    // Login form
    LoginUsername(String),
    LoginPassword(String),
    ToggleLoginPassword,
    SubmitLogin,
    LoginDone(Result<User, ApiError>),

    // Signup form
    SignupEdit(SignupField, String),
    ToggleSignupPassword,
    ToggleConfirmPassword,
    PickProfilePicture,
    ProfilePictureInspected(Vec<FileInfo>),
    ProfilePictureRead(Result<Vec<PickedFile>, Vec<String>>),
    RemoveProfilePicture,
    SubmitSignup,
    SignupDone(Result<User, ApiError>),

    // Music
    ToggleMusic,
    ChangeMusic(String),
    TracksLoaded(Result<Vec<String>, ApiError>),
    TrackFetched(String, Result<Vec<u8>, ApiError>),

    // Menus
    ToggleProfileMenu,
    TogglePhotoMenu(String),
    DismissMenus,

    // Gallery
    RefreshGallery,
    PhotosListed(Result<Vec<String>, ApiError>),
    PhotoLoaded(String, Result<PhotoImages, String>),
    InteractionsLoaded(String, InteractionsFetch),
    OpenLightbox(usize),
    CloseLightbox,
    NextPhoto,
    PreviousPhoto,
    RequestPhotoDelete(String),
    CancelPhotoDelete,
    ConfirmPhotoDelete,
    PhotoDeleted(String, Result<(), ApiError>),
    HideDeleteNotice(u64),
    DismissGalleryError,

    // Likes & comments, keyed by photo name
    ToggleLike(String),
    LikeDone(String, Result<LikeState, ApiError>),
    ToggleComments(String),
    CollapseComments(String),
    DraftChanged(String, String),
    SubmitComment(String),
    CommentAdded(String, Result<Comment, ApiError>),
    HideCommentNotice(String, u64),
    AutoCollapse(String, CollapseTicket),
    RequestCommentDelete(String, i64),
    CancelCommentDelete(String),
    ConfirmCommentDelete(String),
    CommentDeleted(String, i64, Result<(), ApiError>),
    DismissCommentError(String),

    // Uploads
    PickUploads,
    UploadFilesInspected(Vec<FileInfo>),
    UploadFilesRead(Result<Vec<PickedFile>, Vec<String>>),
    Upload(u64, UploadEvent),

    // Message page
    LetterLoaded(Result<Letter, ApiError>),
}

impl Message {
    /// Direct user actions outside the menus. Each one closes an open menu,
    /// the same as a click on empty space.
    fn closes_menus(&self) -> bool {
        matches!(
            self,
            Message::Navigate(_)
                | Message::ShowForm(_)
                | Message::ToggleMusic
                | Message::ChangeMusic(_)
                | Message::RefreshGallery
                | Message::OpenLightbox(_)
                | Message::RequestPhotoDelete(_)
                | Message::DismissGalleryError
                | Message::ToggleLike(_)
                | Message::ToggleComments(_)
                | Message::CollapseComments(_)
                | Message::DraftChanged(..)
                | Message::SubmitComment(_)
                | Message::RequestCommentDelete(..)
                | Message::DismissCommentError(_)
                | Message::PickUploads
        )
    }
}

impl MemoryLane {
    /// Create a new instance of the application
    fn new(config: Config) -> (Self, Task<Message>) {
        let api = ApiClient::new(&config.api_url);
        let session = Session::restore(SessionStore::new(config.session_path.clone()));
        let audio = AudioController::new(RodioSink::open(), &config.api_url, config.volume);
        let route = Route::parse(&config.start_path);

        info!("💕 Memory Lane starting at {} (API: {})", route.path(), api.base());

        let view = resolve(session.is_authenticated(), &route, session.auth_form());
        let mut app = MemoryLane {
            api,
            session,
            audio,
            route,
            mounted: Mounted::new(view),
            menus: MenuState::default(),
            avatar: None,
            refresh_requested: false,
        };

        let mount = app.mount(view);
        let startup = Task::batch([app.fetch_tracks(), app.fetch_avatar(), mount]);
        (app, startup)
    }

    fn title(&self) -> String {
        let page = match self.mounted.view {
            View::Login => "Login",
            View::Signup => "Sign up",
            View::Home => "Home",
            View::Gallery => "Our Story in Pictures",
            View::UploadPhoto => "Upload photos",
            View::UploadMusic => "Upload music",
            View::Message => "A letter for you",
        };
        format!("Memory Lane - {page}")
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        if message.closes_menus() {
            self.menus_mut().dismiss();
        }

        match message {
            Message::Navigate(route) => {
                self.route = route;
                self.sync_view()
            }
            Message::ShowForm(form) => {
                self.session.show_form(form);
                self.sync_view()
            }
            Message::Logout => {
                log_out(&mut self.audio, &mut self.session);
                self.avatar = None;
                self.route = Route::Home;
                self.sync_view()
            }
            Message::AvatarLoaded(username, result) => {
                if !avatar_belongs_to(self.session.current_user(), &username) {
                    debug!("Dropping profile picture of {username}");
                    return Task::none();
                }
                match result {
                    Ok(handle) => self.avatar = Some(handle),
                    Err(e) => warn!("Could not load profile picture: {e}"),
                }
                Task::none()
            }

            Message::LoginUsername(value) => {
                if let Some(form) = self.login_form() {
                    form.edit_username(value);
                }
                Task::none()
            }
            Message::LoginPassword(value) => {
                if let Some(form) = self.login_form() {
                    form.edit_password(value);
                }
                Task::none()
            }
            Message::ToggleLoginPassword => {
                if let Some(form) = self.login_form() {
                    form.toggle_password();
                }
                Task::none()
            }
            Message::SubmitLogin => {
                let Some(credentials) = self.login_form().and_then(LoginForm::submit) else {
                    return Task::none();
                };
                let api = self.api.clone();
                self.scoped(Task::perform(
                    async move { api.login(&credentials).await },
                    Message::LoginDone,
                ))
            }
            Message::LoginDone(result) => self.login_done(result),

            Message::SignupEdit(field, value) => {
                if let Some(form) = self.signup_form() {
                    form.edit(field, value);
                }
                Task::none()
            }
            Message::ToggleSignupPassword => {
                if let Some(form) = self.signup_form() {
                    form.show_password = !form.show_password;
                }
                Task::none()
            }
            Message::ToggleConfirmPassword => {
                if let Some(form) = self.signup_form() {
                    form.show_confirm_password = !form.show_confirm_password;
                }
                Task::none()
            }
            Message::PickProfilePicture => {
                let Some(path) = media::files::pick_file(
                    "Choose a profile picture",
                    "Images",
                    &["jpg", "jpeg", "png", "gif", "webp"],
                ) else {
                    return Task::none();
                };
                self.scoped(Task::perform(
                    media::files::inspect_files(vec![path]),
                    Message::ProfilePictureInspected,
                ))
            }
            Message::ProfilePictureInspected(files) => {
                let Some(form) = self.signup_form() else {
                    return Task::none();
                };
                let Some(file) = files.into_iter().next() else {
                    return Task::none();
                };
                if !form.check_picture(&file) {
                    return Task::none();
                }
                self.scoped(Task::perform(
                    media::files::read_batch(vec![file]),
                    Message::ProfilePictureRead,
                ))
            }
            Message::ProfilePictureRead(result) => {
                let Some(form) = self.signup_form() else {
                    return Task::none();
                };
                match result {
                    Ok(files) => {
                        if let Some(file) = files.into_iter().next() {
                            form.choose_picture(file);
                        }
                    }
                    Err(names) => form.error = Some(format!("Could not read {}", names.join(", "))),
                }
                Task::none()
            }
            Message::RemoveProfilePicture => {
                if let Some(form) = self.signup_form() {
                    form.remove_picture();
                }
                Task::none()
            }
            Message::SubmitSignup => {
                let Some(registration) = self.signup_form().and_then(SignupForm::submit) else {
                    return Task::none();
                };
                self.scoped(Task::perform(
                    register(self.api.clone(), registration),
                    Message::SignupDone,
                ))
            }
            Message::SignupDone(result) => self.signup_done(result),

            Message::ToggleMusic => {
                let fetch = self.audio.toggle_music();
                self.fetch_track(fetch)
            }
            Message::ChangeMusic(track) => {
                let fetch = self.audio.change_music(track);
                self.fetch_track(fetch)
            }
            Message::TrackFetched(track, result) => {
                self.audio.track_fetched(&track, result);
                Task::none()
            }
            Message::TracksLoaded(result) => {
                match result {
                    Ok(tracks) => self.audio.tracks_loaded(tracks),
                    Err(e) => warn!("Could not load music tracks: {e}"),
                }
                Task::none()
            }

            Message::ToggleProfileMenu => {
                self.menus_mut().toggle_profile();
                Task::none()
            }
            Message::TogglePhotoMenu(name) => {
                self.menus_mut().toggle_photo(&name);
                Task::none()
            }
            Message::DismissMenus => {
                self.menus_mut().dismiss();
                Task::none()
            }

            Message::RefreshGallery => {
                let Some(gallery) = self.gallery() else {
                    return Task::none();
                };
                gallery.state.start_refresh();
                self.list_photos()
            }
            Message::PhotosListed(result) => self.photos_listed(result),
            Message::PhotoLoaded(name, result) => {
                match result {
                    Ok(images) => {
                        if let Some(gallery) = self.gallery() {
                            gallery.images.insert(name, images);
                        }
                    }
                    Err(e) => warn!("⚠️  Could not load photo {name}: {e}"),
                }
                Task::none()
            }
            Message::InteractionsLoaded(name, fetch) => {
                let InteractionsFetch { liked, count, comments } = fetch;
                for error in [liked.as_ref().err(), count.as_ref().err()].into_iter().flatten() {
                    warn!("Likes for {name} unavailable: {error}");
                }
                if let Err(e) = &comments {
                    warn!("Comments for {name} unavailable: {e}");
                }

                if let Some(interactions) = self.interactions(&name) {
                    interactions.loaded(liked.ok(), count.ok(), comments.ok());
                }
                Task::none()
            }
            Message::OpenLightbox(index) => {
                if let Some(gallery) = self.gallery() {
                    gallery.state.menus.dismiss();
                    gallery.state.open_lightbox(index);
                }
                Task::none()
            }
            Message::CloseLightbox => {
                if let Some(gallery) = self.gallery() {
                    gallery.state.close_lightbox();
                }
                Task::none()
            }
            Message::NextPhoto => {
                if let Some(gallery) = self.gallery() {
                    gallery.state.next_photo();
                }
                Task::none()
            }
            Message::PreviousPhoto => {
                if let Some(gallery) = self.gallery() {
                    gallery.state.previous_photo();
                }
                Task::none()
            }
            Message::RequestPhotoDelete(name) => {
                if let Some(gallery) = self.gallery() {
                    gallery.state.request_delete(&name);
                }
                Task::none()
            }
            Message::CancelPhotoDelete => {
                if let Some(gallery) = self.gallery() {
                    gallery.state.cancel_delete();
                }
                Task::none()
            }
            Message::ConfirmPhotoDelete => {
                let Some(name) = self.gallery().and_then(|g| g.state.confirm_delete()) else {
                    return Task::none();
                };
                let api = self.api.clone();
                self.scoped(Task::perform(
                    {
                        let name = name.clone();
                        async move { api.delete_image(&name).await }
                    },
                    move |result| Message::PhotoDeleted(name.clone(), result),
                ))
            }
            Message::PhotoDeleted(name, result) => {
                let Some(gallery) = self.gallery() else {
                    return Task::none();
                };
                match result {
                    Ok(()) => {
                        info!("🗑️  Deleted photo {name}");
                        let generation = gallery.state.photo_deleted(&name);
                        gallery.images.remove(&name);
                        self.scoped(after(DELETE_NOTICE_DURATION, Message::HideDeleteNotice(generation)))
                    }
                    Err(e) => {
                        warn!("Could not delete photo {name}: {e}");
                        gallery
                            .state
                            .delete_failed(e.user_message("Failed to delete photo. Please try again."));
                        Task::none()
                    }
                }
            }
            Message::HideDeleteNotice(generation) => {
                if let Some(gallery) = self.gallery() {
                    gallery.state.hide_delete_notice(generation);
                }
                Task::none()
            }
            Message::DismissGalleryError => {
                if let Some(gallery) = self.gallery() {
                    gallery.state.dismiss_error();
                }
                Task::none()
            }

            Message::ToggleLike(name) => {
                let viewer = self.session.viewer_name().to_string();
                let Some(photo) = self.interactions(&name).and_then(PhotoInteractions::toggle_like)
                else {
                    return Task::none();
                };
                let api = self.api.clone();
                self.scoped(Task::perform(
                    async move { api.toggle_like(&photo, &viewer).await },
                    move |result| Message::LikeDone(name.clone(), result),
                ))
            }
            Message::LikeDone(name, result) => {
                if let Some(interactions) = self.interactions(&name) {
                    interactions.like_done(result.map_err(|e| {
                        warn!("Like toggle for {name} failed: {e}");
                        e.user_message("Failed to update like")
                    }));
                }
                Task::none()
            }
            Message::ToggleComments(name) => {
                if let Some(interactions) = self.interactions(&name) {
                    interactions.toggle_comments();
                }
                Task::none()
            }
            Message::CollapseComments(name) => {
                if let Some(interactions) = self.interactions(&name) {
                    interactions.collapse_comments();
                }
                Task::none()
            }
            Message::DraftChanged(name, text) => {
                if let Some(interactions) = self.interactions(&name) {
                    interactions.edit_draft(text);
                }
                Task::none()
            }
            Message::SubmitComment(name) => {
                let viewer = self.session.viewer_name().to_string();
                let Some(comment) = self
                    .interactions(&name)
                    .and_then(|i| i.submit_comment(&viewer))
                else {
                    return Task::none();
                };
                let api = self.api.clone();
                self.scoped(Task::perform(
                    async move { api.add_comment(&comment).await },
                    move |result| Message::CommentAdded(name.clone(), result),
                ))
            }
            Message::CommentAdded(name, result) => self.comment_added(name, result),
            Message::HideCommentNotice(name, generation) => {
                if let Some(interactions) = self.interactions(&name) {
                    interactions.hide_notice(generation);
                }
                Task::none()
            }
            Message::AutoCollapse(name, ticket) => {
                if let Some(interactions) = self.interactions(&name) {
                    if interactions.auto_collapse(ticket) {
                        debug!("Collapsed comments of {name}");
                    }
                }
                Task::none()
            }
            Message::RequestCommentDelete(name, id) => {
                if let Some(interactions) = self.interactions(&name) {
                    interactions.request_delete(id);
                }
                Task::none()
            }
            Message::CancelCommentDelete(name) => {
                if let Some(interactions) = self.interactions(&name) {
                    interactions.cancel_delete();
                }
                Task::none()
            }
            Message::ConfirmCommentDelete(name) => {
                let Some(id) = self.interactions(&name).and_then(PhotoInteractions::confirm_delete)
                else {
                    return Task::none();
                };
                let api = self.api.clone();
                self.scoped(Task::perform(
                    async move { api.delete_comment(id).await },
                    move |result| Message::CommentDeleted(name.clone(), id, result),
                ))
            }
            Message::CommentDeleted(name, id, result) => {
                if let Some(interactions) = self.interactions(&name) {
                    match result {
                        Ok(()) => interactions.comment_deleted(id),
                        Err(e) => {
                            warn!("Could not delete comment {id}: {e}");
                            interactions.error = Some(
                                e.user_message("Failed to delete comment. Please try again."),
                            );
                        }
                    }
                }
                Task::none()
            }
            Message::DismissCommentError(name) => {
                if let Some(interactions) = self.interactions(&name) {
                    interactions.dismiss_error();
                }
                Task::none()
            }

            Message::PickUploads => {
                let Some(kind) = self.upload_board().map(|board| board.kind) else {
                    return Task::none();
                };
                let paths = match kind {
                    UploadKind::Photo => media::files::pick_files(
                        "Select photos to upload",
                        "Images",
                        &["jpg", "jpeg", "png", "gif", "webp"],
                    ),
                    UploadKind::Music => media::files::pick_files(
                        "Select music to upload",
                        "Audio",
                        &["mp3", "wav", "m4a"],
                    ),
                };
                if paths.is_empty() {
                    return Task::none();
                }
                self.scoped(Task::perform(
                    media::files::inspect_files(paths),
                    Message::UploadFilesInspected,
                ))
            }
            Message::UploadFilesInspected(files) => {
                let Some(board) = self.upload_board() else {
                    return Task::none();
                };
                if let Err(rejection) = board.check(&files) {
                    warn!("⚠️  Upload batch rejected: {rejection}");
                    return Task::none();
                }
                self.scoped(Task::perform(
                    media::files::read_batch(files),
                    Message::UploadFilesRead,
                ))
            }
            Message::UploadFilesRead(Ok(files)) => self.start_uploads(files),
            Message::UploadFilesRead(Err(unreadable)) => {
                if let Some(board) = self.upload_board() {
                    let rejection = BatchRejection::Unreadable { files: unreadable };
                    warn!("⚠️  Upload batch rejected: {rejection}");
                    board.reject(rejection);
                }
                Task::none()
            }
            Message::Upload(id, event) => self.upload_event(id, event),

            Message::LetterLoaded(result) => {
                if let Screen::Letter(letter) = &mut self.mounted.screen {
                    *letter = LetterState::loaded(result.map_err(|e| {
                        warn!("No message available: {e}");
                        e.to_string()
                    }));
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let Some(user) = self.session.current_user() else {
            return match &self.mounted.screen {
                Screen::Signup(form) => ui::auth::signup(form),
                Screen::Login(form) => ui::auth::login(form),
                _ => horizontal_space().into(),
            };
        };

        let music = ui::Music {
            playing: self.audio.is_playing(),
            tracks: self.audio.track_list(),
            current: self.audio.current_track(),
        };
        let header = ui::header::view(ui::header::Header {
            user,
            avatar: self.avatar.as_ref(),
            playing: music.playing,
            menu_open: self.menus().is_profile_open(),
        });

        let (page, overlay) = match &self.mounted.screen {
            Screen::Gallery(gallery) => (
                ui::gallery::view(&gallery.state, &gallery.images),
                ui::gallery::overlay(&gallery.state, &gallery.images),
            ),
            Screen::Upload(board) => (ui::upload::view(board), None),
            Screen::Letter(letter) => (ui::message::view(letter), None),
            Screen::Home | Screen::Login(_) | Screen::Signup(_) => (ui::home::view(user, music), None),
        };

        let base = column![header, page].width(Length::Fill).height(Length::Fill);
        match overlay {
            Some(overlay) => stack![base, overlay].into(),
            None => base.into(),
        }
    }

    fn theme(&self) -> Theme {
        ui::style::theme()
    }

    /// Window-wide listeners, each active only while it is needed
    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = Vec::new();

        if self.menus().needs_dismiss_listener() {
            subscriptions.push(event::listen_with(dismiss_on_click));
        }

        if let Screen::Gallery(gallery) = &self.mounted.screen {
            if gallery.state.lightbox.is_some() {
                subscriptions.push(keyboard::on_key_press(lightbox_key));
            }
        }

        Subscription::batch(subscriptions)
    }

    // ========== Mounting ==========

    /// Re-resolve the view. When it changed, the old view is unmounted and
    /// the new one mounted.
    fn sync_view(&mut self) -> Task<Message> {
        let view = resolve(
            self.session.is_authenticated(),
            &self.route,
            self.session.auth_form(),
        );
        if view == self.mounted.view {
            return Task::none();
        }
        self.mount(view)
    }

    fn mount(&mut self, view: View) -> Task<Message> {
        debug!("Mounting {view:?} (leaving {:?})", self.mounted.view);
        self.menus.dismiss();
        // Dropping the previous view aborts everything it started
        self.mounted = Mounted::new(view);

        match view {
            View::Gallery => {
                if std::mem::take(&mut self.refresh_requested) {
                    debug!("Gallery refresh requested by an upload");
                    if let Some(gallery) = self.gallery() {
                        gallery.state.start_refresh();
                    }
                }
                self.list_photos()
            }
            View::Message => {
                let api = self.api.clone();
                self.scoped(Task::perform(
                    async move { api.latest_letter().await },
                    Message::LetterLoaded,
                ))
            }
            _ => Task::none(),
        }
    }

    /// Tie `task` to the mounted view so unmounting aborts it
    fn scoped(&mut self, task: Task<Message>) -> Task<Message> {
        let (task, handle) = task.abortable();
        self.mounted.tasks.push(handle.abort_on_drop());
        task
    }

    // ========== Screen accessors ==========

    fn login_form(&mut self) -> Option<&mut LoginForm> {
        match &mut self.mounted.screen {
            Screen::Login(form) => Some(form),
            _ => None,
        }
    }

    fn signup_form(&mut self) -> Option<&mut SignupForm> {
        match &mut self.mounted.screen {
            Screen::Signup(form) => Some(form),
            _ => None,
        }
    }

    fn gallery(&mut self) -> Option<&mut GalleryScreen> {
        match &mut self.mounted.screen {
            Screen::Gallery(gallery) => Some(gallery),
            _ => None,
        }
    }

    fn interactions(&mut self, photo_name: &str) -> Option<&mut PhotoInteractions> {
        self.gallery()
            .and_then(|gallery| gallery.state.interactions_mut(photo_name))
    }

    fn upload_board(&mut self) -> Option<&mut UploadBoard> {
        match &mut self.mounted.screen {
            Screen::Upload(board) => Some(board),
            _ => None,
        }
    }

    /// The gallery owns the menus while it is mounted, so photo menus and the
    /// profile menu exclude each other
    fn menus(&self) -> &MenuState {
        match &self.mounted.screen {
            Screen::Gallery(gallery) => &gallery.state.menus,
            _ => &self.menus,
        }
    }

    fn menus_mut(&mut self) -> &mut MenuState {
        match &mut self.mounted.screen {
            Screen::Gallery(gallery) => &mut gallery.state.menus,
            _ => &mut self.menus,
        }
    }

    // ========== Session ==========

    fn login_done(&mut self, result: Result<User, ApiError>) -> Task<Message> {
        match result {
            Ok(user) => {
                if let Some(form) = self.login_form() {
                    form.succeeded();
                }
                self.session.login(user);
                // Deep links are not carried through login
                self.route = Route::Home;
                Task::batch([self.fetch_avatar(), self.sync_view()])
            }
            Err(e) => {
                warn!("Login failed: {e}");
                if let Some(form) = self.login_form() {
                    form.failed(e.user_message("Login failed. Please try again."));
                }
                Task::none()
            }
        }
    }

    fn signup_done(&mut self, result: Result<User, ApiError>) -> Task<Message> {
        match result {
            Ok(user) => {
                info!("✅ Account created for {}", user.username);
                let notice = self.signup_form().and_then(|form| {
                    form.succeeded();
                    form.success.take()
                });

                self.session.signup_succeeded();
                let task = self.sync_view();
                if let Some(form) = self.login_form() {
                    form.success = notice;
                }
                task
            }
            Err(e) => {
                warn!("Signup failed: {e}");
                if let Some(form) = self.signup_form() {
                    form.failed(e.user_message("Signup failed. Please try again."));
                }
                Task::none()
            }
        }
    }

    fn fetch_avatar(&self) -> Task<Message> {
        let Some((username, file_name)) = self.session.current_user().and_then(|user| {
            user.profile_picture
                .clone()
                .map(|picture| (user.username.clone(), picture))
        }) else {
            return Task::none();
        };

        let api = self.api.clone();
        Task::perform(
            async move {
                let result = api.profile_picture(&file_name).await.map(Handle::from_bytes);
                (username, result)
            },
            |(username, result)| Message::AvatarLoaded(username, result),
        )
    }

    fn fetch_tracks(&self) -> Task<Message> {
        let api = self.api.clone();
        Task::perform(async move { api.list_music().await }, Message::TracksLoaded)
    }

    /// Download a track the audio controller asked for
    fn fetch_track(&self, track: Option<String>) -> Task<Message> {
        let Some(track) = track else {
            return Task::none();
        };
        debug!("🎵 Fetching track {track}");

        let api = self.api.clone();
        Task::perform(
            async move {
                let bytes = api.track_bytes(&track).await;
                (track, bytes)
            },
            |(track, bytes)| Message::TrackFetched(track, bytes),
        )
    }

    // ========== Gallery ==========

    fn list_photos(&mut self) -> Task<Message> {
        let api = self.api.clone();
        self.scoped(Task::perform(
            async move { api.list_images().await },
            Message::PhotosListed,
        ))
    }

    /// Store the listing, then fetch bytes and interactions of every photo
    /// this view has not seen yet
    fn photos_listed(&mut self, result: Result<Vec<String>, ApiError>) -> Task<Message> {
        let Some(gallery) = self.gallery() else {
            return Task::none();
        };

        let photos = match result {
            Ok(photos) => photos,
            Err(e) => {
                warn!("Could not list photos: {e}");
                gallery.state.listing_failed();
                gallery.state.error = Some(e.user_message("Failed to load photos"));
                return Task::none();
            }
        };

        let fresh = gallery.state.photos_loaded(photos);
        let GalleryScreen { state, images } = gallery;
        images.retain(|name, _| state.photos.contains(name));
        info!("🖼️  {} photos listed, {} new", state.photos.len(), fresh.len());

        let viewer = self.session.viewer_name().to_string();
        let fetches: Vec<Task<Message>> = fresh
            .into_iter()
            .map(|name| self.photo_fetches(name, &viewer))
            .collect();
        self.scoped(Task::batch(fetches))
    }

    /// Image bytes and the joined like/comment fetch for one photo
    fn photo_fetches(&self, name: String, viewer: &str) -> Task<Message> {
        let image = {
            let api = self.api.clone();
            let photo = name.clone();
            let name = name.clone();
            Task::perform(fetch_photo(api, photo), move |result| {
                Message::PhotoLoaded(name.clone(), result)
            })
        };

        let interactions = {
            let api = self.api.clone();
            let photo = name.clone();
            let viewer = viewer.to_string();
            Task::perform(
                async move { api.photo_interactions(&photo, &viewer).await },
                move |fetch| Message::InteractionsLoaded(name.clone(), fetch),
            )
        };

        Task::batch([image, interactions])
    }

    fn comment_added(&mut self, name: String, result: Result<Comment, ApiError>) -> Task<Message> {
        let Some(interactions) = self.interactions(&name) else {
            return Task::none();
        };

        match result {
            Ok(comment) => {
                debug!("Comment {} added to {name}", comment.id);
                let (ticket, notice) = interactions.comment_added(comment);
                Task::batch([
                    self.scoped(after(
                        AUTO_COLLAPSE_DELAY,
                        Message::AutoCollapse(name.clone(), ticket),
                    )),
                    self.scoped(after(NOTICE_DURATION, Message::HideCommentNotice(name, notice))),
                ])
            }
            Err(e) => {
                warn!("Could not comment on {name}: {e}");
                interactions.comment_failed(e.user_message("Failed to add comment. Please try again."));
                Task::none()
            }
        }
    }

    // ========== Uploads ==========

    fn start_uploads(&mut self, files: Vec<PickedFile>) -> Task<Message> {
        let Some(board) = self.upload_board() else {
            return Task::none();
        };
        let kind = board.kind;

        let jobs = board.accept(files);
        info!("📤 Uploading {} files", jobs.len());

        let uploads: Vec<Task<Message>> = jobs
            .into_iter()
            .map(|(id, file)| {
                Task::run(api::upload::upload(self.api.clone(), kind, file), move |event| {
                    Message::Upload(id, event)
                })
            })
            .collect();
        self.scoped(Task::batch(uploads))
    }

    fn upload_event(&mut self, id: u64, event: UploadEvent) -> Task<Message> {
        let Some(board) = self.upload_board() else {
            return Task::none();
        };
        let kind = board.kind;

        match event {
            UploadEvent::Progress { sent, total } => {
                board.progress(id, sent, total);
                Task::none()
            }
            UploadEvent::Finished(result) => {
                let result = result
                    .map(|_| ())
                    .map_err(|e| e.user_message("Upload failed"));
                match board.finished(id, result) {
                    Some(settled) => self.batch_settled(kind, settled),
                    None => Task::none(),
                }
            }
        }
    }

    /// Once a batch with at least one success settles, leave the page after
    /// a short pause
    fn batch_settled(&mut self, kind: UploadKind, settled: BatchSettled) -> Task<Message> {
        info!(
            "Upload batch settled: {} succeeded, {} failed",
            settled.succeeded, settled.failed
        );
        if settled.succeeded == 0 {
            return Task::none();
        }

        let (follow_up, destination) = match kind {
            UploadKind::Photo => {
                self.refresh_requested = true;
                (Task::none(), Route::Gallery)
            }
            UploadKind::Music => (self.fetch_tracks(), Route::Home),
        };

        let navigate = self.scoped(after(NAVIGATE_DELAY, Message::Navigate(destination)));
        Task::batch([follow_up, navigate])
    }
}

/// Deliver `message` once `delay` has passed
fn after(delay: Duration, message: Message) -> Task<Message> {
    Task::perform(tokio::time::sleep(delay), move |()| message.clone())
}

async fn fetch_photo(api: ApiClient, name: String) -> Result<PhotoImages, String> {
    let bytes = api.image_bytes(&name).await.map_err(|e| e.to_string())?;
    let thumbnail = make_thumbnail(bytes.clone()).await?;

    Ok(PhotoImages {
        thumbnail: Handle::from_rgba(thumbnail.width, thumbnail.height, thumbnail.pixels),
        full: Handle::from_bytes(bytes),
    })
}

/// Upload the profile picture first (if any), then create the account
async fn register(api: ApiClient, registration: Registration) -> Result<User, ApiError> {
    let Registration {
        username,
        email,
        password,
        full_name,
        profile_picture,
    } = registration;

    let picture = match profile_picture {
        Some(file) => Some(api.upload_profile_picture(file, &username).await?),
        None => None,
    };

    let request = SignupRequest {
        username: &username,
        email: &email,
        password: &password,
        full_name: &full_name,
        profile_picture: picture.as_deref(),
    };
    api.signup(&request).await
}

/// End the session: the music stops before the session record is cleared
fn log_out<S: AudioSink>(audio: &mut AudioController<S>, session: &mut Session) {
    audio.stop_music();
    session.logout();
}

/// A fetched avatar is only shown to the user it was fetched for
fn avatar_belongs_to(user: Option<&User>, username: &str) -> bool {
    user.is_some_and(|user| user.username == username)
}

/// A left click no widget handled closes any open menu
fn dismiss_on_click(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    match (event, status) {
        (Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)), event::Status::Ignored) => {
            Some(Message::DismissMenus)
        }
        _ => None,
    }
}

fn lightbox_key(key: Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        Key::Named(Named::Escape) => Some(Message::CloseLightbox),
        Key::Named(Named::ArrowRight) => Some(Message::NextPhoto),
        Key::Named(Named::ArrowLeft) => Some(Message::PreviousPhoto),
        _ => None,
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("memory_lane=info")),
        )
        .init();

    let config = Config::load();

    iced::application(MemoryLane::title, MemoryLane::update, MemoryLane::view)
        .theme(MemoryLane::theme)
        .subscription(MemoryLane::subscription)
        .window_size((1100.0, 820.0))
        .centered()
        .run_with(move || MemoryLane::new(config))
}
