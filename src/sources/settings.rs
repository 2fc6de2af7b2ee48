// Windows Settings pages

use crate::types::{Kind, Program, Source};

const SETTINGS_HOST: &str = "explorer.exe";
const URI_SCHEME: &str = "ms-settings:";

/// `(name, page, breadcrumb)`; the empty page is the Settings home.
const PAGES: &[(&str, &str, &str)] = &[
    ("Settings", "", "Windows Settings"),
    ("Display", "display", "Settings > System > Display"),
    ("Night light settings", "nightlight", "Settings > System > Display > Night light settings"),
    ("Advanced scaling settings", "display-advanced", "Settings > System > Display > Advanced scaling settings"),
    ("Graphics settings", "display-advancedgraphics", "Settings > System > Display > Graphics settings"),
    ("Display orientation", "screenrotation", "Settings > System > Display > Display orientation"),
    ("Sound", "sound", "Settings > System > Sound"),
    ("Manage sound devices", "sound-devices", "Settings > System > Sound > Manage sound devices"),
    ("App volume and device preferences", "apps-volume", "Settings > System > Sound > App volume and device preferences"),
    ("Notifications & actions", "notifications", "Settings > System > Notifications & actions"),
    ("Focus assist", "quietmomentshome", "Settings > System > Focus assist"),
    ("Focus assist - During these hours", "quietmomentsscheduled", "Settings > System > Focus assist > During these hours"),
    ("Focus assist - Duplicating my display", "quietmomentspresentation", "Settings > System > Focus assist > When I'm duplicating my display"),
    ("Focus assist - Playing a game full screen", "quietmomentsgame", "Settings > System > Focus assist > When I'm playing a game"),
    ("Power & sleep", "powersleep", "Settings > System > Power & sleep"),
    ("Battery", "batterysaver", "Settings > System > Battery"),
    ("Battery - App usage details", "batterysaver-usagedetails", "Settings > System > Battery > See which apps are affecting your battery life"),
    ("Battery Saver settings", "batterysaver-settings", "Settings > System > Battery > Battery Saver settings"),
    ("Storage", "storagesense", "Settings > System > Storage"),
    ("Configure Storage Sense", "storagepolicies", "Settings > System > Storage > Configure Storage Sense or run it now"),
    ("Change where new content is saved", "savelocations", "Settings > System > Storage > Change where new content is saved"),
    ("Tablet mode", "tabletmode", "Settings > System > Tablet mode"),
    ("Multitasking", "multitasking", "Settings > System > Multitasking"),
    ("Projecting to this PC", "project", "Settings > System > Projecting to this PC"),
    ("Shared experiences", "crossdevice", "Settings > System > Shared experiences"),
    ("Clipboard", "clipboard", "Settings > System > Clipboard"),
    ("Remote Desktop", "remotedesktop", "Settings > System > Remote Desktop"),
    ("Device Encryption", "deviceencryption", "Settings > System > Device Encryption (where available)"),
    ("About", "about", "Settings > System > About"),
    ("Bluetooth & other devices", "bluetooth", "Settings > Devices > Bluetooth & other devices"),
    ("Printers & scanners", "printers", "Settings > Devices > Printers & scanners"),
    ("Mouse", "mousetouchpad", "Settings > Devices > Mouse"),
    ("Touchpad", "devices-touchpad", "Settings > Devices > Touchpad"),
    ("Typing", "typing", "Settings > Devices > Typing"),
    ("Hardware keyboard - Text suggestions", "devicestyping-hwkbtextsuggestions", "Settings > Devices > Typing > Hardware keyboard text suggestions"),
    ("Wheel", "wheel", "Settings > Devices > Wheel (where available)"),
    ("Pen & Windows Ink", "pen", "Settings > Devices > Pen & Windows Ink"),
    ("AutoPlay", "autoplay", "Settings > Devices > AutoPlay"),
    ("USB", "usb", "Settings > Devices > USB"),
    ("Phone", "mobile-devices", "Settings > Phone"),
    ("Add a phone", "mobile-devices-addphone", "Settings > Phone > Add a phone"),
    ("Your Phone (opens app)", "mobile-devices-addphone-direct", "Settings > Phone > Your Phone (opens app)"),
    ("Network & Internet", "network", "Settings > Network & Internet"),
    ("Status", "network-status", "Settings > Network & Internet > Status"),
    ("Cellular & SIM", "network-cellular", "Settings > Network & Internet > Cellular & SIM"),
    ("Wi-Fi", "network-wifi", "Settings > Network & Internet > Wi-Fi"),
    ("Manage known networks", "network-wifisettings", "Settings > Network & Internet > Wi-Fi > Manage known networks"),
    ("Wi-Fi Calling", "network-wificalling", "Settings > Network & Internet > Wi-Fi Calling"),
    ("Ethernet", "network-ethernet", "Settings > Network & Internet > Ethernet"),
    ("Dial-up", "network-dialup", "Settings > Network & Internet > Dial-up"),
    ("DirectAccess", "network-directaccess", "Settings > Network & Internet > DirectAccess (where available)"),
    ("VPN", "network-vpn", "Settings > Network & Internet > VPN"),
    ("Airplane mode", "network-airplanemode", "Settings > Network & Internet > Airplane mode"),
    ("Mobile hotspot", "network-mobilehotspot", "Settings > Network & Internet > Mobile hotspot"),
    ("NFC", "nfctransactions", "Settings > Network & Internet > NFC"),
    ("Data usage", "datausage", "Settings > Network & Internet > Data usage"),
    ("Proxy", "network-proxy", "Settings > Network & Internet > Proxy"),
    ("Personalization", "personalization", "Settings > Personalization"),
    ("Background", "personalization-background", "Settings > Personalization > Background"),
    ("Colors", "colors", "Settings > Personalization > Colors"),
    ("Lock screen", "lockscreen", "Settings > Personalization > Lock screen"),
    ("Themes", "themes", "Settings > Personalization > Themes"),
    ("Fonts", "fonts", "Settings > Personalization > Fonts"),
    ("Start", "personalization-start", "Settings > Personalization > Start"),
    ("Choose which folders appear on Start", "personalization-start-places", "Settings > Personalization > Start > Choose which folders appear on Start"),
    ("Taskbar", "taskbar", "Settings > Personalization > Taskbar"),
    ("Apps & features", "appsfeatures", "Settings > Apps > Apps & features"),
    ("Manage optional features", "optionalfeatures", "Settings > Apps > Manage optional features"),
    ("Default apps", "defaultapps", "Settings > Apps > Default apps"),
    ("Offline maps", "maps", "Settings > Apps > Offline maps"),
    ("Download maps", "maps-downloadmaps", "Settings > Apps > Offline maps > Download maps"),
    ("Apps for websites", "appsforwebsites", "Settings > Apps > Apps for websites"),
    ("Video playback", "videoplayback", "Settings > Apps > Video playback"),
    ("Startup", "startupapps", "Settings > Apps > Startup"),
    ("Your info", "yourinfo", "Settings > Accounts > Your info"),
    ("Email & accounts", "emailandaccounts", "Settings > Accounts > Email & accounts"),
    ("Sign-in options", "signinoptions", "Settings > Accounts > Sign-in options"),
    ("Windows Hello face setup", "signinoptions-launchfaceenrollment", "Settings > Accounts > Sign-in options > Windows Hello face setup"),
    ("Windows Hello fingerprint setup", "signinoptions-launchfingerprintenrollment", "Settings > Accounts > Sign-in options > Windows Hello fingerprint setup"),
    ("Security Key setup", "signinoptions-launchsecuritykeyenrollment", "Settings > Accounts > Sign-in options > Security Key setup"),
    ("Dynamic Lock", "signinoptions-dynamiclock", "Settings > Accounts > Sign-in options > Dynamic Lock"),
    ("Access work or school", "workplace", "Settings > Accounts > Access work or school"),
    ("Family & other people", "otherusers", "Settings > Accounts > Family & other people"),
    ("Set up a kiosk", "assignedaccess", "Settings > Accounts > Set up a kiosk"),
    ("Sync your settings", "sync", "Settings > Accounts > Sync your settings"),
    ("Date & time", "dateandtime", "Settings > Time & language > Date & time"),
    ("Region", "regionformatting", "Settings > Time & language > Region"),
    ("Language", "regionlanguage", "Settings > Time & language > Language"),
    ("Windows Display language", "regionlanguage-setdisplaylanguage", "Settings > Time & language > Language > Windows Display language"),
    ("Add Display language", "regionlanguage-adddisplaylanguage", "Settings > Time & language > Language > Add Display language"),
    ("Speech", "speech", "Settings > Time & language > Speech"),
    ("Game bar", "gaming-gamebar", "Settings > Gaming > Game bar"),
    ("Captures", "gaming-gamedvr", "Settings > Gaming > Captures"),
    ("Broadcasting", "gaming-broadcasting", "Settings > Gaming > Broadcasting"),
    ("Game Mode", "gaming-gamemode", "Settings > Gaming > Game Mode"),
    ("TruePlay", "gaming-trueplay", "Settings > Gaming > TruePlay (removed in version 1809+)"),
    ("Xbox Networking", "gaming-xboxnetworking", "Settings > Gaming > Xbox Networking"),
    ("Display (Ease of Access)", "easeofaccess-display", "Settings > Ease of Access > Display"),
    ("Mouse Pointer", "easeofaccess-cursorandpointersize", "Settings > Ease of Access > Mouse Pointer"),
    ("Text Cursor", "easeofaccess-cursor", "Settings > Ease of Access > Text Cursor"),
    ("Magnifier", "easeofaccess-magnifier", "Settings > Ease of Access > Magnifier"),
    ("Color Filters", "easeofaccess-colorfilter", "Settings > Ease of Access > Color Filters"),
    ("Adaptive Color Filters Link", "easeofaccess-colorfilter-adaptivecolorlink", "Settings > Ease of Access > Color Filters > Adaptive Color Filters Link"),
    ("Night Light Link", "easeofaccess-colorfilter-bluelightlink", "Settings > Ease of Access > Color Filters > Night Light Link"),
    ("High Contrast", "easeofaccess-highcontrast", "Settings > Ease of Access > High Contrast"),
    ("Narrator", "easeofaccess-narrator", "Settings > Ease of Access > Narrator"),
    ("Narrator - Start after sign-in", "easeofaccess-narrator-isautostartenabled", "Settings > Ease of Access > Narrator > Start Narrator after sign-in for me"),
    ("Audio (Ease of Access)", "easeofaccess-audio", "Settings > Ease of Access > Audio"),
    ("Closed captions", "easeofaccess-closedcaptioning", "Settings > Ease of Access > Closed captions"),
    ("Speech (Ease of Access)", "easeofaccess-speechrecognition", "Settings > Ease of Access > Speech"),
    ("Keyboard (Ease of Access)", "easeofaccess-keyboard", "Settings > Ease of Access > Keyboard"),
    ("Mouse (Ease of Access)", "easeofaccess-mouse", "Settings > Ease of Access > Mouse"),
    ("Eye Control", "easeofaccess-eyecontrol", "Settings > Ease of Access > Eye Control"),
    ("Other options (Ease of Access)", "easeofaccess-otheroptions", "Settings > Ease of Access > Other options (removed in version 1809+)"),
    ("Permissions & history", "search-permissions", "Settings > Search > Permissions & history"),
    ("Searching Windows", "cortana-windowssearch", "Settings > Search > Searching Windows"),
    ("Search - More details", "search-moredetails", "Settings > Search > More details"),
    ("Cortana", "cortana", "Settings > Cortana"),
    ("Talk to Cortana", "cortana-talktocortana", "Settings > Cortana > Talk to Cortana"),
    ("Cortana - Permissions", "cortana-permissions", "Settings > Cortana > Permissions"),
    ("Cortana - More details", "cortana-moredetails", "Settings > Cortana > More details"),
    ("General (Privacy)", "privacy", "Settings > Privacy > General"),
    ("Speech (Privacy)", "privacy-speech", "Settings > Privacy > Speech"),
    ("Inking & typing personalization", "privacy-speechtyping", "Settings > Privacy > Inking & typing personalization"),
    ("Diagnostics & feedback", "privacy-feedback", "Settings > Privacy > Diagnostics & feedback"),
    ("View Diagnostic Data", "privacy-feedback-telemetryviewergroup", "Settings > Privacy > Diagnostics & feedback > View Diagnostic Data"),
    ("Activity history", "privacy-activityhistory", "Settings > Privacy > Activity history"),
    ("Location", "privacy-location", "Settings > Privacy > Location"),
    ("Camera", "privacy-webcam", "Settings > Privacy > Camera"),
    ("Microphone", "privacy-microphone", "Settings > Privacy > Microphone"),
    ("Voice activation", "privacy-voiceactivation", "Settings > Privacy > Voice activation"),
    ("Notifications (Privacy)", "privacy-notifications", "Settings > Privacy > Notifications"),
    ("Account info", "privacy-accountinfo", "Settings > Privacy > Account info"),
    ("Contacts", "privacy-contacts", "Settings > Privacy > Contacts"),
    ("Calendar", "privacy-calendar", "Settings > Privacy > Calendar"),
    ("Phone calls", "privacy-phonecalls", "Settings > Privacy > Phone calls (removed in version 1809+)"),
    ("Call history", "privacy-callhistory", "Settings > Privacy > Call history"),
    ("Email", "privacy-email", "Settings > Privacy > Email"),
    ("Eye tracker", "privacy-eyetracker", "Settings > Privacy > Eye tracker (requires hardware)"),
    ("Tasks", "privacy-tasks", "Settings > Privacy > Tasks"),
    ("Messaging", "privacy-messaging", "Settings > Privacy > Messaging"),
    ("Radios", "privacy-radios", "Settings > Privacy > Radios"),
    ("Other devices", "privacy-customdevices", "Settings > Privacy > Other devices"),
    ("Background apps", "privacy-backgroundapps", "Settings > Privacy > Background apps"),
    ("App diagnostics", "privacy-appdiagnostics", "Settings > Privacy > App diagnostics"),
    ("Automatic file downloads", "privacy-automaticfiledownloads", "Settings > Privacy > Automatic file downloads"),
    ("Documents", "privacy-documents", "Settings > Privacy > Documents"),
    ("Pictures", "privacy-pictures", "Settings > Privacy > Pictures"),
    ("Videos", "privacy-videos", "Settings > Privacy > Videos"),
    ("File system", "privacy-broadfilesystemaccess", "Settings > Privacy > File system"),
    ("Windows Update", "windowsupdate", "Settings > Update & security > Windows Update"),
    ("Check for updates", "windowsupdate-action", "Settings > Update & security > Windows Update > Check for updates"),
    ("View update history", "windowsupdate-history", "Settings > Update & security > Windows Update > View update history"),
    ("Restart options", "windowsupdate-restartoptions", "Settings > Update & security > Windows Update > Restart options"),
    ("Advanced options", "windowsupdate-options", "Settings > Update & security > Windows Update > Advanced options"),
    ("Change active hours", "windowsupdate-activehours", "Settings > Update & security > Windows Update > Change active hours"),
    ("Optional updates", "windowsupdate-optionalupdates", "Settings > Update & security > Windows Update > Optional updates"),
    ("Delivery Optimization", "delivery-optimization", "Settings > Update & security > Delivery Optimization"),
    ("Windows Security / Windows Defender", "windowsdefender", "Settings > Update & security > Windows Security"),
    ("Backup", "backup", "Settings > Update & security > Backup"),
    ("Troubleshoot", "troubleshoot", "Settings > Update & security > Troubleshoot"),
    ("Recovery", "recovery", "Settings > Update & security > Recovery"),
    ("Activation", "activation", "Settings > Update & security > Activation"),
    ("Find My Device", "findmydevice", "Settings > Update & security > Find My Device"),
    ("For developers", "developers", "Settings > Update & security > For developers"),
    ("Windows Insider Program", "windowsinsider", "Settings > Update & security > Windows Insider Program"),
    ("Mixed reality", "holographic", "Settings > Mixed reality"),
    ("Audio and speech", "holographic-audio", "Settings > Mixed reality > Audio and speech"),
    ("Environment", "privacy-holographic-environment", "Settings > Mixed reality > Environment"),
    ("Headset display", "holographic-headset", "Settings > Mixed reality > Headset display"),
    ("Uninstall (Mixed Reality)", "holographic-management", "Settings > Mixed reality > Uninstall"),
    ("Extras", "extras", "Settings > Extras (available only when Settings app extensions installed)"),
];

pub trait SettingsSource {
    fn settings_pages(&self) -> Vec<Program>;
}

/// The built-in table of Settings deep links.
pub struct StaticSettingsPages;

impl SettingsSource for StaticSettingsPages {
    fn settings_pages(&self) -> Vec<Program> {
        PAGES
            .iter()
            .map(|(name, page, breadcrumb)| settings_page(name, page, breadcrumb))
            .collect()
    }
}

pub fn settings_page(name: &str, page: &str, breadcrumb: &str) -> Program {
    let mut program = Program::new(name, SETTINGS_HOST, Source::Settings, Kind::Setting);
    program.arguments = format!("{URI_SCHEME}{page}");
    program.description = Some(breadcrumb.to_string());
    program
}
